//! Interactive chat command.

use crate::assistant::Assistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::rag::Conversation;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(model) = model {
        settings.llm.model = model;
    }

    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hoidap doctor' for detailed diagnostics.");
        return Err(e);
    }

    let assistant = Assistant::open(&settings)?;
    let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

    let mut conversation = Conversation::new();

    println!("\n{}", style("FCAJ Assistant").bold().cyan());
    println!("{}\n", prompts.persona.greeting);
    println!(
        "{}\n",
        style("Gõ câu hỏi của bạn, 'clear' để làm mới cuộc trò chuyện, 'exit' để thoát.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("Bạn:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Tạm biệt!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            conversation.clear();
            Output::info("Đã làm mới cuộc trò chuyện.");
            continue;
        }

        let spinner = Output::spinner("Đang tìm kiếm thông tin...");
        let answer = assistant.respond(&mut conversation, input).await;
        spinner.finish_and_clear();

        println!("\n{} {}\n", style("FCAJ:").cyan().bold(), answer);
    }

    Ok(())
}
