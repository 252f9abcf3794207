//! DocChat CLI — the main entry point.
//!
//! Commands:
//! - `onboard`    — Create config, secrets file and folders
//! - `doctor`     — Diagnose configuration and connectivity
//! - `summarize`  — One-shot summary of a document
//! - `ask`        — Interactive Q&A about a document
//! - `chat`       — Interactive chat, optionally grounded in indexed PDFs
//! - `index`      — Build the vector collection from a PDF folder

use clap::{Parser, Subcommand};
use docchat_agent::SummaryFormat;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "docchat",
    about = "DocChat — chat with your documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and folders
    Onboard,

    /// Diagnose configuration and provider access
    Doctor,

    /// Summarize a document (.txt, .md or .pdf)
    Summarize {
        /// The document to summarize
        file: PathBuf,

        /// Summary shape: 100-words, 2-paragraphs or 5-bullets
        #[arg(short, long, default_value = "100-words")]
        format: SummaryFormat,

        /// Use the advanced model
        #[arg(short, long)]
        advanced: bool,
    },

    /// Ask questions about a document
    Ask {
        /// Document to load before the first question
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Use the advanced model
        #[arg(short, long)]
        advanced: bool,
    },

    /// Chat with the assistant
    Chat {
        /// Ground answers in the indexed document collection
        #[arg(long)]
        rag: bool,

        /// Override the context token budget
        #[arg(short, long)]
        budget: Option<i64>,

        /// Use the advanced model
        #[arg(short, long)]
        advanced: bool,
    },

    /// Index a folder of PDFs for `chat --rag`
    Index {
        /// Folder to index (defaults to retrieval.documents_dir)
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Summarize {
            file,
            format,
            advanced,
        } => commands::summarize::run(file, format, advanced).await?,
        Commands::Ask { document, advanced } => commands::ask::run(document, advanced).await?,
        Commands::Chat {
            rag,
            budget,
            advanced,
        } => commands::chat::run(rag, budget, advanced).await?,
        Commands::Index { folder } => commands::index::run(folder).await?,
    }

    Ok(())
}
