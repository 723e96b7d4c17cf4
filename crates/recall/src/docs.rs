//! Document listing and index overview.
//!
//! Shows what the configured paths resolve to once loaded and chunked:
//! per-document chunk counts and sizes plus index totals. Used by
//! `recall docs` to check a configuration before asking questions.

use anyhow::Result;

use crate::config::Config;
use crate::docstore;

/// Run the docs command: load everything and print the overview table.
pub fn run_docs(config: &Config, demo: bool) -> Result<()> {
    let (engine, loaded) = docstore::load_and_index(config, demo)?;

    println!("Recall — Indexed Documents");
    println!("==========================");
    println!();

    if loaded.is_empty() {
        println!("  No documents matched the configured paths.");
        return Ok(());
    }

    println!(
        "  {:<32} {:>7} {:>10}   {}",
        "TITLE", "CHUNKS", "SIZE", "PATH"
    );
    println!("  {}", "-".repeat(76));

    let mut total_bytes = 0u64;
    for doc in &loaded {
        let size = doc.document.content.len() as u64;
        total_bytes += size;
        println!(
            "  {:<32} {:>7} {:>10}   {}",
            fit_title(&doc.document.title, 32),
            doc.document.chunk_count.unwrap_or(0),
            format_bytes(size),
            doc.path.display()
        );
    }

    let stats = engine.stats();
    println!();
    println!("  Documents:   {}", stats.documents);
    println!("  Chunks:      {}", stats.chunks);
    println!("  Content:     {}", format_bytes(total_bytes));

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Cut a title to the column width, char-safe, with a `…` when shortened.
fn fit_title(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    let cut: String = title.chars().take(width - 1).collect();
    format!("{}…", cut)
}
