//! Catalog restriction.
//!
//! Pure functions recomputed by the caller whenever the background, the raw
//! catalog or the size bounds change. Nothing here caches or tracks
//! dependencies.

use std::collections::hash_map;
use std::collections::HashMap;

use pathwise_common::{FeatureSet, RestrictionConfig};
use tracing::debug;

use crate::model::{PathwayDefinition, RestrictedPathway};

/// Working pathway set for one background, keyed by pathway identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestrictedCatalog {
    pathways: HashMap<String, RestrictedPathway>,
}

impl RestrictedCatalog {
    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RestrictedPathway> {
        self.pathways.get(id)
    }

    pub fn iter(&self) -> hash_map::Values<'_, String, RestrictedPathway> {
        self.pathways.values()
    }

    /// Union of every retained pathway's features.
    pub fn annotated_features(&self) -> FeatureSet {
        let mut union = FeatureSet::new();
        for pathway in self.pathways.values() {
            union.extend(pathway.features.iter().cloned());
        }
        union
    }
}

impl FromIterator<RestrictedPathway> for RestrictedCatalog {
    fn from_iter<T: IntoIterator<Item = RestrictedPathway>>(iter: T) -> Self {
        let mut pathways = HashMap::new();
        for pathway in iter {
            if let Some(previous) = pathways.insert(pathway.id.clone(), pathway) {
                debug!(pathway = %previous.id, "Duplicate pathway id; keeping the later definition");
            }
        }
        Self { pathways }
    }
}

/// Normalize one definition and intersect it with the background.
pub fn restrict_pathway(definition: &PathwayDefinition, background: &FeatureSet) -> RestrictedPathway {
    let features = FeatureSet::from_raw(&definition.feature_ids)
        .iter()
        .filter(|id| background.contains(id))
        .cloned()
        .collect();
    RestrictedPathway {
        id: definition.id.clone(),
        name: definition.display_name().to_string(),
        url: definition.url.clone().unwrap_or_default(),
        features,
    }
}

/// Restrict every definition to the background and keep only pathways whose
/// restricted size lies within `bounds`.
pub fn restrict_catalog(
    definitions: &[PathwayDefinition],
    background: &FeatureSet,
    bounds: &RestrictionConfig,
) -> RestrictedCatalog {
    let catalog: RestrictedCatalog = definitions
        .iter()
        .map(|definition| restrict_pathway(definition, background))
        .filter(|pathway| bounds.contains(pathway.size()))
        .collect();

    debug!(
        raw = definitions.len(),
        retained = catalog.len(),
        background = background.len(),
        min = bounds.min_pathway_size,
        max = bounds.max_pathway_size,
        "Restricted pathway catalog"
    );
    catalog
}

/// Foreground and background as they enter the statistic (n and N).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedUniverse {
    pub foreground: FeatureSet,
    pub background: FeatureSet,
}

/// Drop foreground features outside the background. With
/// `annotated_background`, both sets are further narrowed to features that
/// occur in at least one retained pathway.
pub fn resolve_universe(
    foreground: &FeatureSet,
    background: &FeatureSet,
    catalog: &RestrictedCatalog,
    annotated_background: bool,
) -> ResolvedUniverse {
    let background = if annotated_background {
        background.intersection(&catalog.annotated_features())
    } else {
        background.clone()
    };
    let foreground = foreground.intersection(&background);
    ResolvedUniverse { foreground, background }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_pathway_below_min_size_is_dropped() {
        let background = FeatureSet::from_raw(ids(100, "G"));
        let defs = vec![
            PathwayDefinition::new("nine", "Nine", ids(9, "G")),
            PathwayDefinition::new("ten", "Ten", ids(10, "G")),
        ];
        let catalog = restrict_catalog(&defs, &background, &RestrictionConfig::default());
        assert!(catalog.get("nine").is_none());
        assert_eq!(catalog.get("ten").map(|p| p.size()), Some(10));
    }

    #[test]
    fn test_size_is_measured_after_intersection() {
        // 15 raw members, only 9 measured.
        let background = FeatureSet::from_raw(ids(9, "G"));
        let defs = vec![PathwayDefinition::new("p", "P", ids(15, "G"))];
        let catalog = restrict_catalog(&defs, &background, &RestrictionConfig::default());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_pathway_above_max_size_is_dropped() {
        let background = FeatureSet::from_raw(ids(30, "G"));
        let bounds = RestrictionConfig { min_pathway_size: 1, max_pathway_size: 20 };
        let defs = vec![
            PathwayDefinition::new("big", "Big", ids(21, "G")),
            PathwayDefinition::new("ok", "Ok", ids(20, "G")),
        ];
        let catalog = restrict_catalog(&defs, &background, &bounds);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("ok").is_some());
    }

    #[test]
    fn test_restriction_normalises_case() {
        let background = FeatureSet::from_raw(["TP53", "MDM2"]);
        let def = PathwayDefinition::new("p53", "p53", vec!["tp53".into(), "Mdm2".into(), "XYZ".into()]);
        let restricted = restrict_pathway(&def, &background);
        assert_eq!(restricted.features, FeatureSet::from_raw(["TP53", "MDM2"]));
    }

    #[test]
    fn test_duplicate_ids_keep_last() {
        let background = FeatureSet::from_raw(["A", "B"]);
        let bounds = RestrictionConfig { min_pathway_size: 1, max_pathway_size: 10 };
        let defs = vec![
            PathwayDefinition::new("dup", "first", vec!["A".into()]),
            PathwayDefinition::new("dup", "second", vec!["A".into(), "B".into()]),
        ];
        let catalog = restrict_catalog(&defs, &background, &bounds);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("dup").unwrap().name, "second");
    }

    #[test]
    fn test_annotated_universe_restricts_both_sets() {
        let background = FeatureSet::from_raw(["A", "B", "C", "D"]);
        let foreground = FeatureSet::from_raw(["A", "D", "Z"]);
        let bounds = RestrictionConfig { min_pathway_size: 1, max_pathway_size: 10 };
        let defs = vec![PathwayDefinition::new("p", "P", vec!["A".into(), "B".into()])];
        let catalog = restrict_catalog(&defs, &background, &bounds);

        let plain = resolve_universe(&foreground, &background, &catalog, false);
        assert_eq!(plain.background.len(), 4);
        assert_eq!(plain.foreground, FeatureSet::from_raw(["A", "D"]));

        let annotated = resolve_universe(&foreground, &background, &catalog, true);
        assert_eq!(annotated.background, FeatureSet::from_raw(["A", "B"]));
        assert_eq!(annotated.foreground, FeatureSet::from_raw(["A"]));
    }
}
