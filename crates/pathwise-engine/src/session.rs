//! Caller-facing session.
//!
//! Holds the caller's selections and the restricted catalog derived from
//! them. Every change recomputes what it invalidates right away; nothing is
//! tracked implicitly. With `continuous` enabled, changes to the foreground,
//! the catalog or the background policy submit a new analysis on their own.

use std::sync::Arc;

use pathwise_catalog::{restrict_catalog, CatalogSource, PathwayDefinition, RestrictedCatalog};
use pathwise_common::{FeatureSet, PathwiseConfig, PathwiseError, RestrictionConfig, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::executor::{AnalysisExecutor, EnrichmentExecutor};
use crate::outcome::AnalysisOutcome;
use crate::ranking::{RankedResults, ResultPage, ResultQuery};
use crate::request::{AnalysisRequest, RequestId};
use crate::scheduler::{Scheduler, SchedulerHandle};

pub struct AnalysisSession {
    config: PathwiseConfig,
    definitions: Option<Arc<Vec<PathwayDefinition>>>,
    background: FeatureSet,
    foreground: FeatureSet,
    catalog: Arc<RestrictedCatalog>,
    scheduler: SchedulerHandle,
    outcomes: mpsc::UnboundedReceiver<AnalysisOutcome>,
    latest: Option<RankedResults>,
}

impl AnalysisSession {
    /// Must be called from within a tokio runtime; spawns the scheduler.
    pub fn new(config: PathwiseConfig) -> Self {
        Self::with_executor(config, EnrichmentExecutor)
    }

    pub fn with_executor<E: AnalysisExecutor>(config: PathwiseConfig, executor: E) -> Self {
        let (scheduler, outcomes) = Scheduler::spawn(executor);
        Self {
            config,
            definitions: None,
            background: FeatureSet::new(),
            foreground: FeatureSet::new(),
            catalog: Arc::new(RestrictedCatalog::default()),
            scheduler,
            outcomes,
            latest: None,
        }
    }

    pub fn config(&self) -> &PathwiseConfig {
        &self.config
    }

    pub fn has_catalog(&self) -> bool {
        self.definitions.is_some()
    }

    pub fn restricted_catalog(&self) -> &Arc<RestrictedCatalog> {
        &self.catalog
    }

    pub fn background(&self) -> &FeatureSet {
        &self.background
    }

    pub fn foreground(&self) -> &FeatureSet {
        &self.foreground
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    pub fn is_busy(&self) -> bool {
        self.scheduler.is_busy()
    }

    // ── Catalog ────────────────────────────────────────────────────────────

    /// Replace the raw catalog and re-restrict it against the background.
    pub fn set_catalog(&mut self, definitions: Vec<PathwayDefinition>) -> Result<Option<RequestId>> {
        info!(pathways = definitions.len(), "Catalog selected");
        self.definitions = Some(Arc::new(definitions));
        self.restrict();
        self.auto_run()
    }

    pub fn clear_catalog(&mut self) {
        self.definitions = None;
        self.catalog = Arc::new(RestrictedCatalog::default());
    }

    /// Clear the current catalog and load a new one. On failure the session
    /// is left without a catalog and runs are refused until the next load.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) -> Result<Option<RequestId>> {
        self.clear_catalog();
        let location = source.describe();
        match source.load().await {
            Ok(definitions) => self.set_catalog(definitions),
            Err(e) => {
                warn!(source = %location, "Catalog load failed: {}", e);
                Err(match e {
                    PathwiseError::CatalogUnavailable(msg) => PathwiseError::CatalogUnavailable(msg),
                    other => PathwiseError::CatalogUnavailable(format!("{location}: {other}")),
                })
            }
        }
    }

    // ── Selections ─────────────────────────────────────────────────────────

    /// New measurable universe. Re-restricts the catalog but does not submit.
    pub fn set_background<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.background = FeatureSet::from_raw(ids);
        debug!(background = self.background.len(), "Background changed");
        self.restrict();
    }

    pub fn set_foreground<I, S>(&mut self, ids: I) -> Result<Option<RequestId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.foreground = FeatureSet::from_raw(ids);
        debug!(foreground = self.foreground.len(), "Foreground changed");
        self.auto_run()
    }

    /// New size bounds. Re-restricts the catalog but does not submit.
    pub fn set_restriction(&mut self, bounds: RestrictionConfig) {
        self.config.restriction = bounds;
        self.restrict();
    }

    pub fn set_annotated_background(&mut self, enabled: bool) -> Result<Option<RequestId>> {
        self.config.session.annotated_background = enabled;
        self.auto_run()
    }

    /// Enabling continuous mode submits right away.
    pub fn set_continuous(&mut self, enabled: bool) -> Result<Option<RequestId>> {
        self.config.session.continuous = enabled;
        self.auto_run()
    }

    fn restrict(&mut self) {
        self.catalog = match &self.definitions {
            Some(definitions) => Arc::new(restrict_catalog(definitions, &self.background, &self.config.restriction)),
            None => Arc::new(RestrictedCatalog::default()),
        };
    }

    // ── Runs ───────────────────────────────────────────────────────────────

    /// Freeze the current selections into a request.
    pub fn snapshot(&self) -> Result<AnalysisRequest> {
        if !self.has_catalog() {
            return Err(PathwiseError::CatalogUnavailable("no pathway catalog loaded".to_string()));
        }
        Ok(AnalysisRequest::from_selection(
            &self.foreground,
            &self.background,
            Arc::clone(&self.catalog),
            self.config.session.annotated_background,
        ))
    }

    /// Submit the current selections. Returns as soon as the request is
    /// handed to the scheduler.
    pub fn run(&mut self) -> Result<RequestId> {
        let request = self.snapshot()?;
        let id = self.scheduler.submit(request)?;
        info!(request_id = %id, "Analysis submitted");
        Ok(id)
    }

    fn auto_run(&mut self) -> Result<Option<RequestId>> {
        if self.config.session.continuous && self.has_catalog() {
            self.run().map(Some)
        } else {
            Ok(None)
        }
    }

    // ── Outcomes ───────────────────────────────────────────────────────────

    /// Wait for the next delivered outcome and make it the latest.
    ///
    /// Waits indefinitely if nothing is running or pending.
    pub async fn next_outcome(&mut self) -> Option<&RankedResults> {
        let outcome = self.outcomes.recv().await?;
        Some(self.record(outcome))
    }

    /// Take every outcome already delivered without waiting. Returns how many
    /// were received; the last becomes the latest.
    pub fn drain_outcomes(&mut self) -> usize {
        let mut received = 0;
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.record(outcome);
            received += 1;
        }
        received
    }

    fn record(&mut self, outcome: AnalysisOutcome) -> &RankedResults {
        info!(
            request_id = %outcome.request_id,
            results = outcome.results.len(),
            status = ?outcome.status,
            "Analysis outcome received"
        );
        self.latest.insert(RankedResults::from_outcome(outcome))
    }

    pub fn latest(&self) -> Option<&RankedResults> {
        self.latest.as_ref()
    }

    /// Query using the configured page size.
    pub fn default_query(&self) -> ResultQuery {
        ResultQuery::new(self.config.ranking.page_size)
    }

    pub fn query(&self, query: &ResultQuery) -> Option<ResultPage<'_>> {
        self.latest.as_ref().map(|ranked| ranked.query(query))
    }
}
