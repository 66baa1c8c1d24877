//! Catalog sources.
//!
//! A catalog is fetched once per selection. Every failure, whether transport,
//! missing file, or unparseable body, is reported as `CatalogUnavailable` so
//! the caller can leave its working catalog empty.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pathwise_common::{PathwiseError, Result};
use tracing::{debug, info, warn};

use crate::model::PathwayDefinition;

/// On-disk / on-wire layout of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// JSON array of `{pathway, name, url, feature_ids}` records.
    Json,
    /// One gene set per line: `name url id id id ...` (whitespace separated,
    /// GMT-compatible).
    GeneSetLines,
}

impl CatalogFormat {
    /// Guess from a file name or URL; anything not ending in .gmt/.txt is JSON.
    pub fn from_location(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.ends_with(".gmt") || lower.ends_with(".txt") {
            CatalogFormat::GeneSetLines
        } else {
            CatalogFormat::Json
        }
    }
}

/// Common interface for all catalog loaders.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Fetch and parse the whole catalog.
    async fn load(&self) -> Result<Vec<PathwayDefinition>>;
}

/// Parse a catalog body in the given format.
pub fn parse_catalog(body: &str, format: CatalogFormat) -> Result<Vec<PathwayDefinition>> {
    match format {
        CatalogFormat::Json => serde_json::from_str(body)
            .map_err(|e| PathwiseError::CatalogUnavailable(format!("invalid catalog JSON: {e}"))),
        CatalogFormat::GeneSetLines => Ok(parse_gene_set_lines(body)),
    }
}

/// Parse `name url id...` lines. The name doubles as the identifier.
/// Lines with fewer than two fields are skipped.
pub fn parse_gene_set_lines(body: &str) -> Vec<PathwayDefinition> {
    let mut out = Vec::new();
    for (lineno, line) in body.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            if !line.trim().is_empty() {
                warn!(line = lineno + 1, "Skipping malformed gene set line");
            }
            continue;
        };
        out.push(PathwayDefinition {
            id: name.to_string(),
            name: Some(name.to_string()),
            url: Some(url.to_string()),
            feature_ids: fields.map(str::to_string).collect(),
        });
    }
    out
}

// ── HTTP ────────────────────────────────────────────────────────────────────

/// Catalog served over HTTP(S).
pub struct HttpCatalogSource {
    url: String,
    format: CatalogFormat,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let format = CatalogFormat::from_location(&url);
        Self {
            url,
            format,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<Vec<PathwayDefinition>> {
        info!("Downloading pathway catalog from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PathwiseError::CatalogUnavailable(format!("{}: {e}", self.url)))?;

        let body = response
            .text()
            .await
            .map_err(|e| PathwiseError::CatalogUnavailable(format!("{}: {e}", self.url)))?;

        let definitions = parse_catalog(&body, self.format)?;
        info!("Loaded {} pathway definitions from {}", definitions.len(), self.url);
        Ok(definitions)
    }
}

// ── Local file ──────────────────────────────────────────────────────────────

/// Catalog stored on the local filesystem.
pub struct FileCatalogSource {
    path: PathBuf,
    format: CatalogFormat,
}

impl FileCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = CatalogFormat::from_location(&path.to_string_lossy());
        Self { path, format }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<PathwayDefinition>> {
        debug!("Reading pathway catalog from {:?}", self.path);
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PathwiseError::CatalogUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        let definitions = parse_catalog(&body, self.format)?;
        info!("Loaded {} pathway definitions from {:?}", definitions.len(), self.path);
        Ok(definitions)
    }
}

// ── In memory ───────────────────────────────────────────────────────────────

/// Catalog already held in memory; used by tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    definitions: Vec<PathwayDefinition>,
}

impl StaticCatalogSource {
    pub fn new(definitions: Vec<PathwayDefinition>) -> Self {
        Self { definitions }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    fn describe(&self) -> String {
        format!("in-memory catalog ({} pathways)", self.definitions.len())
    }

    async fn load(&self) -> Result<Vec<PathwayDefinition>> {
        Ok(self.definitions.clone())
    }
}
