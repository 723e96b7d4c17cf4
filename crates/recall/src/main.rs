//! # Recall CLI (`recall`)
//!
//! The `recall` binary answers questions from documents on your own disk.
//! It loads the configured files, indexes them in memory, and serves
//! extractive answers with confidence scores and source attributions.
//! Nothing leaves the machine and nothing persists between runs.
//!
//! ## Usage
//!
//! ```bash
//! recall --config ./config/recall.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recall ask "<question>"` | Answer a single question and exit |
//! | `recall chat` | Interactive question-answering session |
//! | `recall docs` | List the loaded documents and index totals |
//!
//! ## Examples
//!
//! ```bash
//! # One-shot question over the configured document paths
//! recall ask "What is the attendance requirement?"
//!
//! # Same, as JSON for scripting
//! recall ask "What is the attendance requirement?" --json
//!
//! # Try it without any setup, on the built-in sample corpus
//! recall ask --demo "What is the attendance requirement?"
//!
//! # Interactive session; /docs /stats /reload /quit inside
//! recall chat
//!
//! # Show what would be indexed
//! recall docs
//! ```

mod ask;
mod chat;
mod config;
mod demo;
mod docs;
mod docstore;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Recall — local question answering over your own documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/recall.example.toml` for a full example. Without the
/// flag, `./config/recall.toml` is used when present, built-in defaults
/// otherwise.
#[derive(Parser)]
#[command(
    name = "recall",
    about = "Recall — ask questions of your own documents, fully offline",
    version,
    long_about = "Recall indexes a configured set of local text documents in memory and \
    answers free-text questions against them: lexical retrieval over overlapping chunks, \
    extractive answers assembled from the best-matching passages, each with a confidence \
    score and source attributions. No network, no database, no model downloads."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When omitted, `./config/recall.toml` is used if it exists;
    /// otherwise built-in defaults apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in sample corpus instead of configured document paths.
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a single question and exit.
    ///
    /// Loads and indexes the configured documents, runs the question
    /// through retrieval and synthesis, and prints the answer with a
    /// confidence percentage and a ranked source list.
    Ask {
        /// The question to answer.
        question: String,

        /// Emit the full answer as pretty-printed JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive question-answering session.
    ///
    /// Documents are loaded once at startup; every input line is answered
    /// against them. Repeated questions are served from the answer cache
    /// and marked as such. Slash commands: `/docs` lists documents,
    /// `/stats` shows index counters, `/reload` picks up new, changed,
    /// and deleted files, `/quit` exits.
    Chat,

    /// List the documents that would be indexed.
    ///
    /// Resolves the configured paths, loads and chunks every matching
    /// file, and prints a table of titles, chunk counts, and sizes along
    /// with index totals.
    Docs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recall=warn,recall_core=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ask { question, json } => {
            ask::run_ask(&cfg, &question, json, cli.demo)?;
        }
        Commands::Chat => {
            chat::run_chat(&cfg, cli.demo)?;
        }
        Commands::Docs => {
            docs::run_docs(&cfg, cli.demo)?;
        }
    }

    Ok(())
}
