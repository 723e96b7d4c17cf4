//! Loads documents from the configured filesystem paths.
//!
//! Each matching file becomes one [`Document`]. The SHA-256 content
//! fingerprint lets `chat`'s `/reload` tell edited files from untouched
//! ones without comparing whole bodies.

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;
use walkdir::WalkDir;

use recall_core::engine::Engine;
use recall_core::models::Document;

use crate::config::Config;
use crate::demo;

/// A document together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub path: PathBuf,
    pub fingerprint: String,
}

/// Resolve the document set (built-in sample corpus or configured paths),
/// index all of it into a fresh engine, and record per-document chunk
/// counts. The common startup path of every command.
pub fn load_and_index(config: &Config, demo: bool) -> Result<(Engine, Vec<LoadedDocument>)> {
    let mut loaded = if demo {
        demo::demo_documents()
    } else {
        load_documents(config)?
    };

    let engine = Engine::new(config.engine_config());
    for doc in &mut loaded {
        let chunks = engine.ingest(&doc.document)?;
        doc.document.chunk_count = Some(chunks);
    }

    Ok((engine, loaded))
}

/// Scan every configured path and load the matching files, in
/// deterministic path order. A configured path that does not exist is an
/// error; an existing path with no matching files just contributes
/// nothing.
pub fn load_documents(config: &Config) -> Result<Vec<LoadedDocument>> {
    let include_set = build_globset(&config.documents.include)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.documents.exclude.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut loaded = Vec::new();

    for root in &config.documents.paths {
        if !root.exists() {
            bail!("Document path does not exist: {}", root.display());
        }

        for entry in WalkDir::new(root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().to_string();

            // Apply exclude patterns
            if exclude_set.is_match(&rel_str) {
                continue;
            }

            // Apply include patterns
            if !include_set.is_match(&rel_str) {
                continue;
            }

            loaded.push(load_file(path)?);
        }
    }

    // Sort for deterministic ordering
    loaded.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(count = loaded.len(), "loaded documents from disk");
    Ok(loaded)
}

fn load_file(path: &Path) -> Result<LoadedDocument> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata
        .modified()
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
    let modified_secs = modified
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let content = std::fs::read_to_string(path).unwrap_or_default();

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(LoadedDocument {
        document: Document {
            id: Uuid::new_v4().to_string(),
            title,
            content: content.clone(),
            upload_date: Utc.timestamp_opt(modified_secs, 0).unwrap(),
            chunk_count: None,
        },
        path: path.to_path_buf(),
        fingerprint: fingerprint(&content),
    })
}

/// SHA-256 hex digest of a document body.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentsConfig;
    use std::fs;

    fn config_for(root: &Path) -> Config {
        Config {
            documents: DocumentsConfig {
                paths: vec![root.to_path_buf()],
                include: vec!["**/*.md".to_string(), "**/*.txt".to_string()],
                exclude: Vec::new(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_loads_matching_files_in_path_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("beta.md"), "Beta body.").unwrap();
        fs::write(tmp.path().join("alpha.md"), "Alpha body.").unwrap();
        fs::write(tmp.path().join("notes.txt"), "Notes body.").unwrap();
        fs::write(tmp.path().join("image.png"), "not text").unwrap();

        let loaded = load_documents(&config_for(tmp.path())).unwrap();
        let titles: Vec<&str> = loaded.iter().map(|d| d.document.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha.md", "beta.md", "notes.txt"]);
    }

    #[test]
    fn test_excludes_apply_before_includes() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("drafts")).unwrap();
        fs::write(tmp.path().join("keep.md"), "Kept.").unwrap();
        fs::write(tmp.path().join("drafts/skip.md"), "Skipped.").unwrap();

        let mut config = config_for(tmp.path());
        config.documents.exclude = vec!["**/drafts/**".to_string()];

        let loaded = load_documents(&config).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].document.title, "keep.md");
    }

    #[test]
    fn test_missing_path_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = config_for(&tmp.path().join("absent"));
        assert!(load_documents(&config).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        assert_eq!(fingerprint("same"), fingerprint("same"));
        assert_ne!(fingerprint("one"), fingerprint("two"));
    }
}
