//! pathwise-catalog — Pathway catalogs: loading, the database registry, and
//! restriction of a raw catalog to the current background.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathwise_catalog::{registry::CatalogRegistry, restrict::restrict_catalog, CatalogSource};
//! use pathwise_common::{FeatureSet, RestrictionConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = CatalogRegistry::builtin();
//!     let source = registry.source_for("GeneSymbol_GO_HSapiens")?;
//!     let definitions = source.load().await?;
//!
//!     let background = FeatureSet::from_raw(["TP53", "MDM2", "CDKN1A"]);
//!     let catalog = restrict_catalog(&definitions, &background, &RestrictionConfig::default());
//!     println!("{} pathways overlap the background", catalog.len());
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod restrict;
pub mod source;
pub mod registry;

pub use model::{PathwayDefinition, RestrictedPathway};
pub use restrict::{resolve_universe, restrict_catalog, ResolvedUniverse, RestrictedCatalog};
pub use source::{CatalogFormat, CatalogSource, FileCatalogSource, HttpCatalogSource, StaticCatalogSource};
