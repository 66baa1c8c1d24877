//! Executes one analysis request: one hypergeometric test per restricted
//! pathway, scored in parallel.

use std::time::Instant;

use pathwise_catalog::RestrictedPathway;
use pathwise_stats::{upper_tail, HypergeometricParams};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::outcome::{AnalysisOutcome, EnrichmentResult, OutcomeStatus, PathwayFailure};
use crate::request::AnalysisRequest;

/// Seam between the scheduler and the computation it runs.
///
/// Implementations are called on a blocking thread and must run to
/// completion; there is no cancellation.
pub trait AnalysisExecutor: Send + Sync + 'static {
    fn execute(&self, request: &AnalysisRequest) -> AnalysisOutcome;
}

/// The production executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichmentExecutor;

impl AnalysisExecutor for EnrichmentExecutor {
    fn execute(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        run_enrichment(request)
    }
}

/// Score every pathway of the request's restricted catalog.
#[instrument(skip(request), fields(request_id = %request.id(), pathways = request.catalog().len()))]
pub fn run_enrichment(request: &AnalysisRequest) -> AnalysisOutcome {
    let t0 = Instant::now();

    if request.catalog().is_empty() {
        info!("No pathway overlaps the background; nothing to compare");
        let mut outcome = AnalysisOutcome::for_request(request, OutcomeStatus::NoOverlappingAnnotation);
        outcome.elapsed_ms = t0.elapsed().as_millis() as u64;
        return outcome;
    }

    let pathways: Vec<&RestrictedPathway> = request.catalog().iter().collect();
    let scored: Vec<Result<EnrichmentResult, PathwayFailure>> = pathways
        .par_iter()
        .map(|pathway| score_one(request, pathway))
        .collect();

    let mut outcome = AnalysisOutcome::for_request(request, OutcomeStatus::Enriched);
    for entry in scored {
        match entry {
            Ok(result) => outcome.results.push(result),
            Err(failure) => outcome.failures.push(failure),
        }
    }
    outcome.elapsed_ms = t0.elapsed().as_millis() as u64;

    info!(
        scored = outcome.results.len(),
        failed = outcome.failures.len(),
        foreground = outcome.foreground_size,
        background = outcome.background_size,
        elapsed_ms = outcome.elapsed_ms,
        "Enrichment analysis complete"
    );
    outcome
}

fn score_one(request: &AnalysisRequest, pathway: &RestrictedPathway) -> Result<EnrichmentResult, PathwayFailure> {
    let overlap = request.foreground().intersection_count(&pathway.features);
    let params = HypergeometricParams::new(
        request.background().len() as u64,
        pathway.size() as u64,
        request.foreground().len() as u64,
        overlap as u64,
    );
    match upper_tail(&params) {
        Ok(p_value) => Ok(EnrichmentResult::new(pathway, &params, p_value)),
        Err(e) => {
            warn!(pathway = %pathway.id, "Skipping pathway: {}", e);
            Err(PathwayFailure {
                pathway_id: pathway.id.clone(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_catalog::{restrict_catalog, PathwayDefinition, ResolvedUniverse, RestrictedCatalog};
    use pathwise_common::{FeatureSet, RestrictionConfig};
    use std::sync::Arc;

    fn bounds() -> RestrictionConfig {
        RestrictionConfig { min_pathway_size: 1, max_pathway_size: 100 }
    }

    #[test]
    fn test_tiny_example() {
        let background = FeatureSet::from_raw(["A", "B", "C"]);
        let defs = vec![PathwayDefinition::new("AB", "AB", vec!["a".into(), "B".into()])];
        let catalog = Arc::new(restrict_catalog(&defs, &background, &bounds()));
        let request = AnalysisRequest::from_selection(&FeatureSet::from_raw(["A"]), &background, catalog, false);

        let outcome = run_enrichment(&request);
        assert_eq!(outcome.status, OutcomeStatus::Enriched);
        assert_eq!(outcome.results.len(), 1);
        let r = &outcome.results[0];
        assert_eq!((r.background_size, r.pathway_size, r.foreground_size, r.overlap), (3, 2, 1, 1));
        assert!((r.p_value - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_catalog_is_unannotated() {
        let request = AnalysisRequest::new(
            ResolvedUniverse {
                foreground: FeatureSet::from_raw(["A"]),
                background: FeatureSet::from_raw(["A", "B"]),
            },
            Arc::new(RestrictedCatalog::default()),
        );
        let outcome = run_enrichment(&request);
        assert!(outcome.is_unannotated());
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.foreground_size, 1);
        assert_eq!(outcome.background_size, 2);
    }

    #[test]
    fn test_bad_pathway_does_not_abort_batch() {
        // Catalog restricted against a wider background than the request's,
        // so one pathway is larger than N.
        let wide = FeatureSet::from_raw(["A", "B", "C", "D", "E"]);
        let defs = vec![
            PathwayDefinition::new("big", "Big", vec!["A".into(), "B".into(), "C".into(), "D".into()]),
            PathwayDefinition::new("small", "Small", vec!["A".into()]),
        ];
        let catalog = Arc::new(restrict_catalog(&defs, &wide, &bounds()));
        let request = AnalysisRequest::new(
            ResolvedUniverse {
                foreground: FeatureSet::from_raw(["A"]),
                background: FeatureSet::from_raw(["A", "B"]),
            },
            catalog,
        );

        let outcome = run_enrichment(&request);
        assert_eq!(outcome.status, OutcomeStatus::Enriched);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].pathway_id, "small");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].pathway_id, "big");
    }
}
