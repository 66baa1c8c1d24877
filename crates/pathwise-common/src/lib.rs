//! pathwise-common — Shared types, errors, and configuration used across all Pathwise crates.

pub mod error;
pub mod feature;
pub mod config;

// Re-export commonly used types
pub use config::{PathwiseConfig, RestrictionConfig, SessionConfig, RankingConfig, CatalogConfig, CatalogDatabase};
pub use error::{PathwiseError, Result};
pub use feature::{FeatureId, FeatureSet};
