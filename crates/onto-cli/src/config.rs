//! Application configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use onto_curation::SearchConfig;
use onto_map::{LookupConfig, SimilarityConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings read once at start-up. Missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub similarity: SimilarityConfig,
    pub search: SearchConfig,
    pub lookup: LookupConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config
            .similarity
            .validate()
            .with_context(|| format!("invalid similarity settings in {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
