//! Subcommand implementations and the terminal plumbing they share.

pub mod ask;
pub mod chat;
pub mod doctor;
pub mod index;
pub mod onboard;
pub mod summarize;

use std::io::Write;
use std::sync::Arc;

use docchat_agent::ChatStreamEvent;
use docchat_config::AppConfig;
use docchat_core::provider::Provider;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Resolve the API key and build the configured provider.
pub fn connect(config: &AppConfig) -> Result<Arc<dyn Provider>, Box<dyn std::error::Error>> {
    let api_key = docchat_security::resolve_api_key(config)?;
    Ok(docchat_providers::build_from_config(config, &api_key)?)
}

/// User-facing text for a failed request.
pub fn describe_error(error: &docchat_core::Error) -> String {
    if error.is_authentication_failure() {
        "Invalid API key. Please check your key and try again.".into()
    } else {
        error.to_string()
    }
}

/// Line-at-a-time stdin with a prompt label.
pub struct LineReader {
    lines: Lines<BufReader<Stdin>>,
}

impl LineReader {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and wait for a line. `None` on end of input.
    pub async fn prompt(&mut self, label: &str) -> std::io::Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }
}

/// Print a streamed reply as it arrives, then the token footer.
pub fn spawn_printer(mut rx: mpsc::Receiver<ChatStreamEvent>, budget: i64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut started = false;
        while let Some(event) = rx.recv().await {
            match event {
                ChatStreamEvent::Chunk { content } => {
                    if !started {
                        print!("\n  Assistant > ");
                        started = true;
                    }
                    print!("{content}");
                    let _ = std::io::stdout().flush();
                }
                ChatStreamEvent::Done {
                    truncated,
                    total_tokens,
                    ..
                } => {
                    println!("\n");
                    println!("  Total tokens used for this request: {total_tokens}");
                    if truncated {
                        println!("  ⚠️  Conversation buffer truncated to fit within {budget} tokens.");
                    }
                    println!();
                }
                ChatStreamEvent::Error { .. } => {
                    if started {
                        println!();
                    }
                }
            }
        }
    })
}

/// Fresh event channel plus the task printing it.
pub fn stream_to_stdout(budget: i64) -> (mpsc::Sender<ChatStreamEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(64);
    (tx, spawn_printer(rx, budget))
}
