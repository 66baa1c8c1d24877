//! Configuration loading for Pathwise.
//! Reads pathwise.toml from the current directory or path in PATHWISE_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{PathwiseError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathwiseConfig {
    #[serde(default)]
    pub restriction: RestrictionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

// ── Restriction ───────────────────────────────────────────────────────────────

/// Size bounds applied after a pathway is intersected with the background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestrictionConfig {
    #[serde(default = "default_min_pathway_size")]
    pub min_pathway_size: usize,
    #[serde(default = "default_max_pathway_size")]
    pub max_pathway_size: usize,
}

fn default_min_pathway_size() -> usize { 10 }
fn default_max_pathway_size() -> usize { 10_000 }

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            min_pathway_size: default_min_pathway_size(),
            max_pathway_size: default_max_pathway_size(),
        }
    }
}

impl RestrictionConfig {
    pub fn contains(&self, size: usize) -> bool {
        size >= self.min_pathway_size && size <= self.max_pathway_size
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Drop background features that appear in no pathway.
    #[serde(default = "bool_true")]
    pub annotated_background: bool,
    /// Re-run automatically whenever the foreground changes.
    #[serde(default)]
    pub continuous: bool,
}

fn bool_true() -> bool { true }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            annotated_background: bool_true(),
            continuous: false,
        }
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

fn default_page_size()       -> usize { 10 }
fn default_max_name_length() -> usize { 45 }

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_name_length: default_max_name_length(),
        }
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// One selectable pathway database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDatabase {
    pub id: String,
    /// URL or local file path of the catalog file.
    pub location: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub id_type: String,
    /// Pathway collection, e.g. "KEGG" or "GO".
    #[serde(default)]
    pub collection: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Database selected when none is given explicitly.
    pub default_database: Option<String>,
    /// Extra databases; entries with a built-in id replace the built-in.
    #[serde(default)]
    pub databases: Vec<CatalogDatabase>,
    /// Base URL that relative built-in catalog locations are resolved against.
    pub base_url: Option<String>,
}

mod tests;

impl PathwiseConfig {
    /// Load configuration from pathwise.toml.
    /// Checks PATHWISE_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var("PATHWISE_CONFIG")
            .unwrap_or_else(|_| "pathwise.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PathwiseError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PathwiseConfig =
            toml::from_str(content).map_err(|e| PathwiseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject bounds that could never retain a pathway.
    pub fn validate(&self) -> Result<()> {
        let r = &self.restriction;
        if r.min_pathway_size > r.max_pathway_size {
            return Err(PathwiseError::Config(format!(
                "min_pathway_size ({}) exceeds max_pathway_size ({})",
                r.min_pathway_size, r.max_pathway_size
            )));
        }
        if self.ranking.page_size == 0 {
            return Err(PathwiseError::Config("ranking.page_size must be positive".into()));
        }
        Ok(())
    }
}
