//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("hoidap Setup");
    println!();
    println!("Welcome to hoidap! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API keys
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    let mut missing_keys = Vec::new();
    for (purpose, env_var) in [
        ("LLM responses", settings.llm.api_key_env.as_str()),
        ("embeddings", settings.embedding.api_key_env.as_str()),
    ] {
        match std::env::var(env_var) {
            Ok(key) if !key.is_empty() => {
                Output::success(&format!("{} is configured ({})", env_var, purpose));
            }
            _ => {
                Output::warning(&format!("{} is not set (needed for {})", env_var, purpose));
                missing_keys.push(env_var.to_string());
            }
        }
    }

    if !missing_keys.is_empty() {
        println!();
        println!("  Set the missing key(s) in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        for key in &missing_keys {
            println!("  {}", style(format!("export {}='...'", key)).green());
        }
        println!();

        if !prompt_continue("Continue without API key(s)?")? {
            println!();
            Output::info("Setup cancelled. Set your API key(s) and run 'hoidap init' again.");
            return Ok(());
        }
    }

    println!();

    // Step 2: Check data directory
    println!("{}", style("Step 2: Checking data directory").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if data_dir.is_dir() {
        Output::success(&format!("Data directory exists: {}", data_dir.display()));
    } else {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
        Output::info("Place your .pdf and .txt documents there, then run 'hoidap ingest'.");
    }

    println!();

    // Step 3: Create config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("hoidap config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("hoidap doctor").cyan());
    println!("  {} Build the document index", style("hoidap ingest").cyan());
    println!(
        "  {} Ask your first question",
        style("hoidap ask \"FCAJ là gì?\"").cyan()
    );
    println!();
    println!("For more help: {}", style("hoidap --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
