use anyhow::{bail, Result};

use crate::config::Config;
use crate::docstore;

/// Run the ask command: index the documents, answer once, print.
pub fn run_ask(config: &Config, question: &str, json: bool, demo: bool) -> Result<()> {
    let (engine, loaded) = docstore::load_and_index(config, demo)?;

    if loaded.is_empty() {
        bail!(
            "No documents matched the configured paths; nothing to answer from. \
             Adjust [documents] in the config, or try --demo."
        );
    }

    let answer = engine.answer(question);

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!("{}", answer.answer);
    println!();
    println!("Confidence: {:.0}%", answer.confidence * 100.0);

    if !answer.sources.is_empty() {
        println!();
        println!("Sources:");
        for (i, source) in answer.sources.iter().enumerate() {
            println!("  {}. [{:.2}] {}", i + 1, source.score, source.doc_title);
            println!("     \"{}\"", source.snippet.replace('\n', " ").trim());
        }
    }

    Ok(())
}
