//! `docchat summarize` — One-shot document summary.

use std::path::PathBuf;

use docchat_agent::{ChatModel, Summarizer, SummaryFormat};
use docchat_documents::load_document;

use super::{CommandResult, connect, describe_error, load_config};

pub async fn run(file: PathBuf, format: SummaryFormat, advanced: bool) -> CommandResult {
    let config = load_config()?;
    let provider = connect(&config)?;

    let document = load_document(&file)?;
    if document.is_empty() {
        return Err(format!("{} contains no text to summarize", document.name).into());
    }

    let summarizer = Summarizer::new(ChatModel::from_config(provider, &config, advanced));

    eprint!("  Summarizing {} ({format})...", document.name);
    let result = summarizer.summarize(&document.text, format).await;
    eprint!("\r{}\r", " ".repeat(40 + document.name.len()));

    match result {
        Ok(summary) => {
            println!("{}", summary.text);
            Ok(())
        }
        Err(e) => Err(describe_error(&e).into()),
    }
}
