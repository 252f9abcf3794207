//! `docchat ask` — Interactive question answering about a document.
//!
//! In-session commands:
//! - `/load <path>` — load (or replace) the document
//! - `/clear`       — forget the conversation, keep the document
//! - `exit`         — quit

use std::path::{Path, PathBuf};

use docchat_agent::{ChatModel, ChatSession, ContextAssembler, DocumentQa};
use docchat_documents::load_document;

use super::{CommandResult, LineReader, connect, describe_error, load_config, stream_to_stdout};

pub async fn run(document: Option<PathBuf>, advanced: bool) -> CommandResult {
    let config = load_config()?;
    let provider = connect(&config)?;

    let assembler = ContextAssembler::from_config(&config.context)?;
    let budget = assembler.budget();
    let qa = DocumentQa::new(ChatModel::from_config(provider, &config, advanced), assembler);

    let mut session = ChatSession::new();
    if let Some(path) = document {
        attach(&mut session, &path)?;
    }

    println!();
    println!("  📄 Document Question Answering");
    println!();
    println!("  Model:     {}", config.model_for(advanced));
    println!(
        "  Document:  {}",
        session.document().map(|d| d.name.as_str()).unwrap_or("(none — use /load <path>)")
    );
    println!();
    println!("  Type your question and press Enter. `/load <path>` loads a document.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut reader = LineReader::new();
    while let Some(line) = reader.prompt("  You > ").await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        if let Some(path) = line.strip_prefix("/load ") {
            if let Err(e) = attach(&mut session, Path::new(path.trim())) {
                eprintln!("  [Error] {e}");
            }
            continue;
        }

        if line == "/clear" {
            session.clear_history();
            println!("  Conversation cleared.");
            continue;
        }

        let (tx, printer) = stream_to_stdout(budget);
        let result = qa.ask(&mut session, line, &tx).await;
        drop(tx);
        let _ = printer.await;

        if let Err(e) = result {
            eprintln!("  [Error] {}", describe_error(&e));
            if e.is_authentication_failure() {
                break;
            }
        }
    }

    let summary = session.end();
    println!();
    println!("  Session ended after {} messages. Goodbye! 👋", summary.turns);
    println!();
    Ok(())
}

fn attach(session: &mut ChatSession, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(path)?;
    println!(
        "  ✅ Processed {} ({} characters). You can now ask questions about it.",
        document.name,
        document.text.chars().count()
    );
    session.attach_document(document);
    Ok(())
}
