//! Ranking and paging of a delivered outcome.

use std::cmp::Ordering;

use serde::Serialize;

use crate::outcome::{AnalysisOutcome, EnrichmentResult, OutcomeStatus};
use crate::request::RequestId;

/// Results of one outcome in ascending p-value order.
///
/// Ties on p are broken by pathway identifier so the order is total and two
/// identical outcomes always rank identically.
#[derive(Debug, Clone)]
pub struct RankedResults {
    outcome: AnalysisOutcome,
}

impl RankedResults {
    pub fn from_outcome(mut outcome: AnalysisOutcome) -> Self {
        outcome.results.sort_by(compare_results);
        Self { outcome }
    }

    pub fn results(&self) -> &[EnrichmentResult] {
        &self.outcome.results
    }

    pub fn status(&self) -> &OutcomeStatus {
        &self.outcome.status
    }

    pub fn request_id(&self) -> RequestId {
        self.outcome.request_id
    }

    pub fn foreground_size(&self) -> usize {
        self.outcome.foreground_size
    }

    pub fn background_size(&self) -> usize {
        self.outcome.background_size
    }

    pub fn outcome(&self) -> &AnalysisOutcome {
        &self.outcome
    }

    pub fn len(&self) -> usize {
        self.outcome.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.results.is_empty()
    }

    pub fn find(&self, pathway_id: &str) -> Option<&EnrichmentResult> {
        self.outcome.results.iter().find(|r| r.pathway_id == pathway_id)
    }

    /// Ranked results whose display name contains `search`, ignoring case.
    /// An empty search matches everything.
    pub fn filtered(&self, search: &str) -> Vec<&EnrichmentResult> {
        let needle = search.trim().to_lowercase();
        self.outcome
            .results
            .iter()
            .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn query(&self, query: &ResultQuery) -> ResultPage<'_> {
        let matching = self.filtered(&query.search);
        let total = matching.len();
        let page_size = query.page_size.max(1);
        let start = query.offset.min(total.saturating_sub(page_size));
        let end = total.min(start + page_size);
        ResultPage {
            items: matching[start..end].to_vec(),
            start,
            end,
            total,
            page_size,
        }
    }
}

fn compare_results(a: &EnrichmentResult, b: &EnrichmentResult) -> Ordering {
    a.p_value
        .total_cmp(&b.p_value)
        .then_with(|| a.pathway_id.cmp(&b.pathway_id))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultQuery {
    pub search: String,
    pub offset: usize,
    pub page_size: usize,
}

impl Default for ResultQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            offset: 0,
            page_size: 10,
        }
    }
}

impl ResultQuery {
    pub fn new(page_size: usize) -> Self {
        Self { page_size, ..Self::default() }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// One window of ranked results. `start..end` indexes into the filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage<'a> {
    pub items: Vec<&'a EnrichmentResult>,
    pub start: usize,
    pub end: usize,
    /// Number of results matching the search.
    pub total: usize,
    pub page_size: usize,
}

impl ResultPage<'_> {
    pub fn has_next(&self) -> bool {
        self.end < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    /// Offset of the following page; stays put on the last page.
    pub fn next_offset(&self) -> usize {
        if self.has_next() { self.start + self.page_size } else { self.start }
    }

    pub fn previous_offset(&self) -> usize {
        self.start.saturating_sub(self.page_size)
    }
}

/// Name cut to `max_len` characters, with a trailing ellipsis when shortened.
pub fn display_name(result: &EnrichmentResult, max_len: usize) -> String {
    if result.name.chars().count() <= max_len {
        return result.name.clone();
    }
    if max_len == 0 {
        return String::new();
    }
    let mut short: String = result.name.chars().take(max_len.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_catalog::{ResolvedUniverse, RestrictedCatalog};
    use pathwise_common::FeatureSet;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use crate::request::AnalysisRequest;

    fn result(id: &str, name: &str, p: f64) -> EnrichmentResult {
        EnrichmentResult {
            pathway_id: id.to_string(),
            name: name.to_string(),
            url: String::new(),
            overlap: 1,
            pathway_size: 10,
            foreground_size: 5,
            background_size: 100,
            p_value: p,
            fold_enrichment: 2.0,
        }
    }

    fn ranked(results: Vec<EnrichmentResult>) -> RankedResults {
        let request = AnalysisRequest::new(
            ResolvedUniverse {
                foreground: FeatureSet::from_raw(["A"]),
                background: FeatureSet::from_raw(["A", "B"]),
            },
            Arc::new(RestrictedCatalog::default()),
        );
        let mut outcome = AnalysisOutcome::for_request(&request, OutcomeStatus::Enriched);
        outcome.results = results;
        RankedResults::from_outcome(outcome)
    }

    fn ids(items: &[&EnrichmentResult]) -> Vec<String> {
        items.iter().map(|r| r.pathway_id.clone()).collect()
    }

    fn numbered(count: usize) -> RankedResults {
        ranked(
            (0..count)
                .map(|i| result(&format!("p{i:02}"), &format!("Pathway {i}"), i as f64 / 100.0))
                .collect(),
        )
    }

    #[test]
    fn test_sorted_by_p_then_id() {
        let r = ranked(vec![
            result("c", "C", 0.5),
            result("b", "B", 0.01),
            result("a", "A", 0.5),
            result("d", "D", 1.0),
        ]);
        let order: Vec<&str> = r.results().iter().map(|x| x.pathway_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let r = ranked(vec![
            result("x", "p53 signaling pathway", 0.1),
            result("y", "Cell cycle", 0.2),
            result("z", "P53-dependent apoptosis", 0.3),
        ]);
        assert_eq!(ids(&r.filtered("P53")), vec!["x", "z"]);
        assert_eq!(r.filtered("").len(), 3);
    }

    #[test]
    fn test_page_window_is_clamped() {
        let r = numbered(25);

        let first = r.query(&ResultQuery::new(10));
        assert_eq!((first.start, first.end, first.total), (0, 10, 25));
        assert!(first.has_next());
        assert!(!first.has_previous());

        let past_end = r.query(&ResultQuery::new(10).with_offset(40));
        assert_eq!((past_end.start, past_end.end), (15, 25));
        assert_eq!(past_end.items.len(), 10);
        assert!(!past_end.has_next());
    }

    #[test]
    fn test_short_list_fits_one_page() {
        let r = numbered(3);
        let page = r.query(&ResultQuery::new(10).with_offset(5));
        assert_eq!((page.start, page.end, page.total), (0, 3, 3));
    }

    #[test]
    fn test_navigation_offsets() {
        let r = numbered(25);
        let page = r.query(&ResultQuery::new(10).with_offset(10));
        assert_eq!(page.next_offset(), 20);
        assert_eq!(page.previous_offset(), 0);

        let last = r.query(&ResultQuery::new(10).with_offset(page.next_offset()));
        assert_eq!(last.start, 15);
        assert_eq!(last.next_offset(), 15);
    }

    #[test]
    fn test_paging_applies_to_filtered_total() {
        let r = numbered(25);
        let page = r.query(&ResultQuery::new(10).with_search("pathway 1"));
        // "Pathway 1" and "Pathway 10".."Pathway 19"
        assert_eq!(page.total, 11);
        assert_eq!(page.items[0].pathway_id, "p01");
    }

    #[test]
    fn test_display_name_truncates_on_char_boundary() {
        let long = result("x", "Égalité signalling through the ß-catenin destruction complex", 0.1);
        let shown = display_name(&long, 10);
        assert_eq!(shown.chars().count(), 10);
        assert!(shown.starts_with("Égalité s"));
        assert!(shown.ends_with('…'));

        let short = result("y", "Cell cycle", 0.1);
        assert_eq!(display_name(&short, 45), "Cell cycle");
    }

    #[test]
    fn test_display_name_never_exceeds_limit() {
        let r = result("x", "Cell cycle", 0.1);
        assert_eq!(display_name(&r, 0), "");
        assert_eq!(display_name(&r, 1), "…");
        for max_len in 0..12 {
            assert!(display_name(&r, max_len).chars().count() <= max_len);
        }
    }
}
