//! Pathway records as they arrive from a catalog, and after restriction.

use pathwise_common::FeatureSet;
use serde::{Deserialize, Deserializer, Serialize};

/// Name shown for a pathway that carries neither a name nor an identifier.
pub const UNKNOWN_PATHWAY: &str = "unknown pathway";

/// One catalog entry. Immutable once loaded.
///
/// Catalog JSON uses `pathway` for the identifier; feature ids may be strings
/// or numbers (NCBI gene ids are published as integers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayDefinition {
    #[serde(rename = "pathway", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(alias = "ids", deserialize_with = "deserialize_feature_ids")]
    pub feature_ids: Vec<String>,
}

impl PathwayDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, feature_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            url: None,
            feature_ids,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Name, falling back to the identifier for unnamed pathways.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ if !self.id.trim().is_empty() => &self.id,
            _ => UNKNOWN_PATHWAY,
        }
    }
}

fn deserialize_feature_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "feature id must be a string or number, got {other}"
            ))),
        })
        .collect()
}

/// A pathway after normalization and intersection with the background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestrictedPathway {
    pub id: String,
    /// Display name, already resolved through `PathwayDefinition::display_name`.
    pub name: String,
    pub url: String,
    pub features: FeatureSet,
}

impl RestrictedPathway {
    pub fn size(&self) -> usize {
        self.features.len()
    }
}
