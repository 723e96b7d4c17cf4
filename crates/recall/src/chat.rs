use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use recall_core::engine::Engine;

use crate::config::Config;
use crate::docstore::{self, LoadedDocument};

/// What the session knows about one loaded file, keyed by path. The
/// fingerprint is what `/reload` compares to spot edited files.
struct FileRecord {
    doc_id: String,
    title: String,
    fingerprint: String,
    chunks: usize,
}

/// Run the chat command: answer stdin lines until `/quit` or EOF.
pub fn run_chat(config: &Config, demo: bool) -> Result<()> {
    let (engine, loaded) = docstore::load_and_index(config, demo)?;

    if loaded.is_empty() {
        println!(
            "Warning: no documents matched the configured paths. \
             Every answer will be the fallback until /reload finds some."
        );
    }

    let mut records = record_map(&loaded);

    let stats = engine.stats();
    println!(
        "Recall — {} documents, {} chunks indexed.",
        stats.documents, stats.chunks
    );
    println!("Type a question, or /docs, /stats, /reload, /quit.");
    println!();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break; // stdin closed
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" => break,
            "/docs" => print_docs(&records),
            "/stats" => print_stats(&engine),
            "/reload" => {
                if demo {
                    println!("Demo corpus is built in; nothing to reload.");
                } else if let Err(err) = reload(&engine, config, &mut records) {
                    println!("Reload failed: {:#}", err);
                }
            }
            question => {
                let was_cached = engine.cached(question);
                let answer = engine.answer(question);

                println!("{}", answer.answer);
                if was_cached {
                    println!("Confidence: {:.0}% (cached)", answer.confidence * 100.0);
                } else {
                    println!("Confidence: {:.0}%", answer.confidence * 100.0);
                }
                if !answer.sources.is_empty() {
                    let titles: Vec<&str> =
                        answer.sources.iter().map(|s| s.doc_title.as_str()).collect();
                    println!("Sources: {}", titles.join(", "));
                }
                println!();
            }
        }
    }

    println!("Bye.");
    Ok(())
}

fn record_map(loaded: &[LoadedDocument]) -> HashMap<PathBuf, FileRecord> {
    loaded
        .iter()
        .map(|doc| {
            (
                doc.path.clone(),
                FileRecord {
                    doc_id: doc.document.id.clone(),
                    title: doc.document.title.clone(),
                    fingerprint: doc.fingerprint.clone(),
                    chunks: doc.document.chunk_count.unwrap_or(0),
                },
            )
        })
        .collect()
}

fn print_docs(records: &HashMap<PathBuf, FileRecord>) {
    if records.is_empty() {
        println!("No documents loaded.");
        return;
    }
    let mut rows: Vec<&FileRecord> = records.values().collect();
    rows.sort_by(|a, b| a.title.cmp(&b.title));
    for rec in rows {
        println!("  {:<32} {:>5} chunks", rec.title, rec.chunks);
    }
}

fn print_stats(engine: &Engine) {
    let stats = engine.stats();
    println!("  Documents:      {}", stats.documents);
    println!("  Chunks:         {}", stats.chunks);
    println!("  Cached answers: {}", stats.cached_answers);
}

/// Re-scan the configured paths and bring the index up to date: ingest
/// new files, replace edited ones (remove then ingest, so the stale
/// chunks and any cached answers citing them go away), and drop files
/// that disappeared.
fn reload(
    engine: &Engine,
    config: &Config,
    records: &mut HashMap<PathBuf, FileRecord>,
) -> Result<()> {
    let fresh = docstore::load_documents(config)?;

    let mut added = 0usize;
    let mut changed = 0usize;
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for doc in fresh {
        seen.insert(doc.path.clone());
        let existing = records
            .get(&doc.path)
            .map(|rec| (rec.doc_id.clone(), rec.fingerprint.clone()));
        match existing {
            Some((_, fingerprint)) if fingerprint == doc.fingerprint => {}
            Some((old_id, _)) => {
                engine.remove_document(&old_id);
                let chunks = engine.ingest(&doc.document)?;
                records.insert(
                    doc.path.clone(),
                    FileRecord {
                        doc_id: doc.document.id.clone(),
                        title: doc.document.title.clone(),
                        fingerprint: doc.fingerprint.clone(),
                        chunks,
                    },
                );
                changed += 1;
            }
            None => {
                let chunks = engine.ingest(&doc.document)?;
                records.insert(
                    doc.path.clone(),
                    FileRecord {
                        doc_id: doc.document.id.clone(),
                        title: doc.document.title.clone(),
                        fingerprint: doc.fingerprint.clone(),
                        chunks,
                    },
                );
                added += 1;
            }
        }
    }

    let gone: Vec<PathBuf> = records
        .keys()
        .filter(|path| !seen.contains(*path))
        .cloned()
        .collect();
    let removed = gone.len();
    for path in gone {
        if let Some(rec) = records.remove(&path) {
            engine.remove_document(&rec.doc_id);
        }
    }

    println!(
        "Reloaded: {} new, {} changed, {} removed.",
        added, changed, removed
    );
    Ok(())
}
