//! Immutable analysis snapshots.

use std::fmt;
use std::sync::Arc;

use pathwise_catalog::{resolve_universe, ResolvedUniverse, RestrictedCatalog};
use pathwise_common::FeatureSet;
use serde::{Deserialize, Serialize};

/// Scheduler-assigned request number; strictly increasing per scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything one analysis needs, frozen at submission time. The sets are
/// shared read-only with the computation context, so later changes on the
/// caller's side never reach a submitted request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    id: RequestId,
    foreground: Arc<FeatureSet>,
    background: Arc<FeatureSet>,
    catalog: Arc<RestrictedCatalog>,
}

impl AnalysisRequest {
    /// Build from an already-resolved universe.
    pub fn new(universe: ResolvedUniverse, catalog: Arc<RestrictedCatalog>) -> Self {
        Self {
            id: RequestId::default(),
            foreground: Arc::new(universe.foreground),
            background: Arc::new(universe.background),
            catalog,
        }
    }

    /// Resolve the caller's selection against the restricted catalog and
    /// freeze it. See [`resolve_universe`] for the annotated-background rule.
    pub fn from_selection(
        foreground: &FeatureSet,
        background: &FeatureSet,
        catalog: Arc<RestrictedCatalog>,
        annotated_background: bool,
    ) -> Self {
        let universe = resolve_universe(foreground, background, &catalog, annotated_background);
        Self::new(universe, catalog)
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: RequestId) {
        self.id = id;
    }

    pub fn foreground(&self) -> &Arc<FeatureSet> {
        &self.foreground
    }

    pub fn background(&self) -> &Arc<FeatureSet> {
        &self.background
    }

    pub fn catalog(&self) -> &Arc<RestrictedCatalog> {
        &self.catalog
    }
}
