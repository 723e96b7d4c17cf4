use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use recall_core::chunk::ChunkParams;
use recall_core::engine::EngineConfig;
use recall_core::search::SearchParams;
use recall_core::synthesize::SynthesisParams;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default = "default_paths")]
    pub paths: Vec<PathBuf>,
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

fn default_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("./docs")]
}

fn default_include() -> Vec<String> {
    vec!["**/*.md".to_string(), "**/*.txt".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_target_chars")]
    pub target_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
    #[serde(default = "default_boundary_window")]
    pub boundary_window: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chars: default_target_chars(),
            overlap_chars: default_overlap_chars(),
            boundary_window: default_boundary_window(),
        }
    }
}

fn default_target_chars() -> usize {
    500
}
fn default_overlap_chars() -> usize {
    80
}
fn default_boundary_window() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

fn default_top_k() -> usize {
    3
}
fn default_min_score() -> f64 {
    0.1
}

#[derive(Debug, Deserialize, Clone)]
pub struct SynthesisConfig {
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
    #[serde(default = "default_max_answer_chars")]
    pub max_answer_chars: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_sources: default_max_sources(),
            max_answer_chars: default_max_answer_chars(),
        }
    }
}

fn default_max_sources() -> usize {
    3
}
fn default_max_answer_chars() -> usize {
    1200
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    512
}

impl Config {
    /// Project the file-level settings into the engine's parameter structs.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            chunking: ChunkParams {
                target_chars: self.chunking.target_chars,
                overlap_chars: self.chunking.overlap_chars,
                boundary_window: self.chunking.boundary_window,
            },
            retrieval: SearchParams {
                top_k: self.retrieval.top_k,
                min_score: self.retrieval.min_score,
            },
            synthesis: SynthesisParams {
                max_sources: self.synthesis.max_sources,
                max_answer_chars: self.synthesis.max_answer_chars,
            },
            cache_capacity: self.cache.capacity,
        }
    }
}

/// Load the configuration for a run. An explicitly passed path must
/// exist; without one, `./config/recall.toml` is used when present and
/// built-in defaults otherwise.
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => {
            let fallback = Path::new("./config/recall.toml");
            if fallback.exists() {
                load_config(fallback)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.target_chars == 0 {
        anyhow::bail!("chunking.target_chars must be > 0");
    }

    if config.chunking.overlap_chars >= config.chunking.target_chars {
        anyhow::bail!("chunking.overlap_chars must be < chunking.target_chars");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if !(0.0..=1.0).contains(&config.retrieval.min_score) {
        anyhow::bail!("retrieval.min_score must be in [0.0, 1.0]");
    }

    // Validate synthesis
    if !(1..=3).contains(&config.synthesis.max_sources) {
        anyhow::bail!("synthesis.max_sources must be between 1 and 3");
    }

    if config.synthesis.max_answer_chars == 0 {
        anyhow::bail!("synthesis.max_answer_chars must be > 0");
    }

    // Validate cache
    if config.cache.capacity < 1 {
        anyhow::bail!("cache.capacity must be >= 1");
    }

    Ok(config)
}
