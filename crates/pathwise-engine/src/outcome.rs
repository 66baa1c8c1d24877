//! Results delivered for one executed request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pathwise_catalog::{RestrictedCatalog, RestrictedPathway};
use pathwise_common::FeatureSet;
use pathwise_stats::HypergeometricParams;
use serde::{Deserialize, Serialize};

use crate::request::{AnalysisRequest, RequestId};

/// Score of one pathway for one request. Built in one step; every field is
/// present from construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub pathway_id: String,
    pub name: String,
    pub url: String,
    /// k
    pub overlap: u64,
    /// K
    pub pathway_size: u64,
    /// n
    pub foreground_size: u64,
    /// N
    pub background_size: u64,
    pub p_value: f64,
    pub fold_enrichment: f64,
}

impl EnrichmentResult {
    pub fn new(pathway: &RestrictedPathway, params: &HypergeometricParams, p_value: f64) -> Self {
        Self {
            pathway_id: pathway.id.clone(),
            name: pathway.name.clone(),
            url: pathway.url.clone(),
            overlap: params.observed,
            pathway_size: params.pathway_size,
            foreground_size: params.sample_size,
            background_size: params.background_size,
            p_value,
            fold_enrichment: params.fold_enrichment(),
        }
    }
}

/// A pathway whose statistic could not be computed. The rest of the batch is
/// unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayFailure {
    pub pathway_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// At least one pathway was eligible and scored.
    Enriched,
    /// No pathway survived restriction: nothing was comparable, which is
    /// different from nothing being significant.
    NoOverlappingAnnotation,
    /// The computation context died before producing results.
    Aborted(String),
}

/// Everything delivered for one executed request.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub request_id: RequestId,
    pub status: OutcomeStatus,
    pub results: Vec<EnrichmentResult>,
    pub failures: Vec<PathwayFailure>,
    /// Resolved n.
    pub foreground_size: usize,
    /// Resolved N.
    pub background_size: usize,
    pub foreground: Arc<FeatureSet>,
    pub catalog: Arc<RestrictedCatalog>,
    pub elapsed_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisOutcome {
    /// Outcome with no results yet, carrying the request's resolved sets.
    pub fn for_request(request: &AnalysisRequest, status: OutcomeStatus) -> Self {
        Self {
            request_id: request.id(),
            status,
            results: Vec::new(),
            failures: Vec::new(),
            foreground_size: request.foreground().len(),
            background_size: request.background().len(),
            foreground: request.foreground().clone(),
            catalog: request.catalog().clone(),
            elapsed_ms: 0,
            completed_at: Utc::now(),
        }
    }

    pub fn is_unannotated(&self) -> bool {
        self.status == OutcomeStatus::NoOverlappingAnnotation
    }
}
