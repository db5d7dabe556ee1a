//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("hoidap Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    // Check API keys
    println!("{}", style("API Configuration").bold());
    let llm_check = check_api_key(&settings.llm.api_key_env);
    llm_check.print();
    checks.push(llm_check);
    let embedding_check = check_api_key(&settings.embedding.api_key_env);
    embedding_check.print();
    checks.push(embedding_check);

    println!();

    // Check data directory and index
    println!("{}", style("Documents & Index").bold());
    let data_check = check_data_dir(settings);
    data_check.print();
    checks.push(data_check);
    let index_check = check_index(settings).await;
    index_check.print();
    checks.push(index_check);

    println!();

    // Check configuration
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using hoidap.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! hoidap is ready to use.");
    }

    Ok(())
}

/// Check if an API key environment variable is configured.
fn check_api_key(env_var: &str) -> CheckResult {
    match std::env::var(env_var) {
        Ok(key) if key.len() > 8 => {
            let masked = format!("{}...{}", &key[..4], &key[key.len() - 4..]);
            CheckResult::ok(env_var, &format!("configured ({})", masked))
        }
        Ok(key) if !key.is_empty() => CheckResult::ok(env_var, "configured"),
        Ok(_) => CheckResult::error(
            env_var,
            "empty",
            &format!("Set with: export {}='...'", env_var),
        ),
        Err(_) => CheckResult::error(
            env_var,
            "not set",
            &format!("Set with: export {}='...'", env_var),
        ),
    }
}

/// Check the source document directory.
fn check_data_dir(settings: &Settings) -> CheckResult {
    let data_dir = settings.data_dir();
    if data_dir.is_dir() {
        let count = crate::ingest::discover_files(&data_dir)
            .map(|files| files.len())
            .unwrap_or(0);
        if count == 0 {
            CheckResult::warning(
                "Data directory",
                &format!("{} (no .pdf/.txt files)", data_dir.display()),
                "Place documents there before running 'hoidap ingest'",
            )
        } else {
            CheckResult::ok(
                "Data directory",
                &format!("{} ({} files)", data_dir.display(), count),
            )
        }
    } else {
        CheckResult::warning(
            "Data directory",
            &format!("{} (missing)", data_dir.display()),
            "Create it and add documents, or set general.data_dir in the config",
        )
    }
}

/// Check the persisted index.
async fn check_index(settings: &Settings) -> CheckResult {
    let index_path = settings.index_path();
    if !index_path.exists() {
        return CheckResult::error(
            "Vector index",
            &format!("{} (not built)", index_path.display()),
            "Run 'hoidap ingest' to build the index",
        );
    }

    match SqliteVectorStore::open_existing(&index_path) {
        Ok(store) => match store.chunk_count().await {
            Ok(0) => CheckResult::warning(
                "Vector index",
                &format!("{} (empty)", index_path.display()),
                "The data directory had no readable documents at ingest time",
            ),
            Ok(count) => CheckResult::ok(
                "Vector index",
                &format!("{} ({} chunks)", index_path.display(), count),
            ),
            Err(e) => CheckResult::error(
                "Vector index",
                &format!("unreadable: {}", e),
                "Re-run 'hoidap ingest' to rebuild the index",
            ),
        },
        Err(e) => CheckResult::error(
            "Vector index",
            &format!("unreadable: {}", e),
            "Re-run 'hoidap ingest' to rebuild the index",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: hoidap init (or hoidap config edit)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }
}
