//! Fixtures shared by the integration tests of the Pathwise crates.

use pathwise_catalog::PathwayDefinition;
use pathwise_common::RestrictionConfig;

/// `count` identifiers `PREFIX0 .. PREFIX{count-1}`.
pub fn numbered_ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

/// Identifiers `PREFIX{start} .. PREFIX{end-1}`.
pub fn id_range(prefix: &str, start: usize, end: usize) -> Vec<String> {
    (start..end).map(|i| format!("{prefix}{i}")).collect()
}

pub fn definition(id: &str, name: &str, members: &[&str]) -> PathwayDefinition {
    PathwayDefinition::new(id, name, members.iter().map(|s| s.to_string()).collect())
        .with_url(format!("https://pathways.example.org/{id}"))
}

/// Bounds that keep any pathway with at least one background feature.
pub fn permissive_bounds() -> RestrictionConfig {
    RestrictionConfig { min_pathway_size: 1, max_pathway_size: 10_000 }
}

/// The three-feature worked example: background {A,B,C}, foreground {A},
/// pathway {A,B}. Expected p-value 2/3.
pub fn tiny_example() -> (Vec<String>, Vec<String>, Vec<PathwayDefinition>) {
    (
        vec!["A".into(), "B".into(), "C".into()],
        vec!["a".into()],
        vec![definition("AB", "Pathway AB", &["A", "b"])],
    )
}

/// A 200-gene background with three pathways of differing enrichment for a
/// foreground of G0..G19:
/// - `strong`: G0..G14 plus 5 unrelated genes (15 of 20 in the foreground)
/// - `weak`: G15..G19 plus 25 unrelated genes
/// - `none`: 20 genes disjoint from the foreground
pub fn graded_catalog() -> (Vec<String>, Vec<String>, Vec<PathwayDefinition>) {
    let background = numbered_ids("G", 200);
    let foreground = id_range("G", 0, 20);

    let mut strong = id_range("G", 0, 15);
    strong.extend(id_range("G", 100, 105));
    let mut weak = id_range("G", 15, 20);
    weak.extend(id_range("G", 120, 145));
    let none = id_range("G", 150, 170);

    let defs = vec![
        PathwayDefinition::new("strong", "Strongly enriched", strong),
        PathwayDefinition::new("weak", "Weakly enriched", weak),
        PathwayDefinition::new("none", "Not enriched", none),
    ];
    (background, foreground, defs)
}

/// Serialize definitions in the catalog JSON layout.
pub fn catalog_json(defs: &[PathwayDefinition]) -> String {
    serde_json::to_string(defs).unwrap_or_else(|_| "[]".to_string())
}
