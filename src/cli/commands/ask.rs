//! Ask command implementation.

use crate::assistant::Assistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::{Conversation, Turn};
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    k: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(model) = model {
        settings.llm.model = model;
    }
    if let Some(k) = k {
        settings.retrieval.k = k;
    }

    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hoidap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = Assistant::open(&settings)?;

    let mut conversation = Conversation::new();
    conversation.push(Turn::user(question));

    let spinner = Output::spinner("Đang tìm kiếm thông tin...");

    match assistant.ask(&conversation, question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Nguồn");
                for source in &response.sources {
                    Output::search_result(&source.chunk.source, source.score, &source.chunk.content);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
