//! Load catalogs from disk and restrict them against a background.

use std::io::Write;

use pathwise_catalog::{
    registry::CatalogRegistry, resolve_universe, restrict_catalog, CatalogSource, FileCatalogSource,
};
use pathwise_common::{CatalogConfig, CatalogDatabase, FeatureSet, RestrictionConfig};
use pathwise_test_utils::{catalog_json, graded_catalog, permissive_bounds, tiny_example};
use pretty_assertions::assert_eq;

fn temp_file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_json_file_round_trips_through_restriction() {
    let (background, _, defs) = graded_catalog();
    let file = temp_file(".json", &catalog_json(&defs));

    let loaded = FileCatalogSource::new(file.path()).load().await.unwrap();
    assert_eq!(loaded, defs);

    let background = FeatureSet::from_raw(&background);
    let catalog = restrict_catalog(&loaded, &background, &RestrictionConfig::default());
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.get("strong").unwrap().size(), 20);
    assert_eq!(catalog.get("weak").unwrap().size(), 30);
}

#[tokio::test]
async fn test_gene_set_lines_file() {
    let file = temp_file(
        ".txt",
        "SET_ONE http://example.org/1 a b c\nSET_TWO http://example.org/2 C D\n",
    );
    let loaded = FileCatalogSource::new(file.path()).load().await.unwrap();
    assert_eq!(loaded.len(), 2);

    let background = FeatureSet::from_raw(["A", "B", "C"]);
    let catalog = restrict_catalog(&loaded, &background, &permissive_bounds());
    assert_eq!(catalog.get("SET_ONE").unwrap().size(), 3);
    assert_eq!(catalog.get("SET_TWO").unwrap().size(), 1);
}

#[tokio::test]
async fn test_registry_loads_configured_file_database() {
    let (_, _, defs) = tiny_example();
    let file = temp_file(".json", &catalog_json(&defs));
    let config = CatalogConfig {
        default_database: Some("tiny".into()),
        base_url: None,
        databases: vec![CatalogDatabase {
            id: "tiny".into(),
            location: file.path().display().to_string(),
            species: "Testus exemplaris".into(),
            id_type: "Symbols".into(),
            collection: "Fixture".into(),
        }],
    };
    let registry = CatalogRegistry::from_config(&config);
    let loaded = registry.source_for("tiny").unwrap().load().await.unwrap();
    assert_eq!(loaded, defs);
}

#[test]
fn test_tiny_example_universe() {
    let (background, foreground, defs) = tiny_example();
    let background = FeatureSet::from_raw(&background);
    let foreground = FeatureSet::from_raw(&foreground);
    let catalog = restrict_catalog(&defs, &background, &permissive_bounds());

    let universe = resolve_universe(&foreground, &background, &catalog, false);
    assert_eq!(universe.background.len(), 3);
    assert_eq!(universe.foreground.len(), 1);
    assert_eq!(catalog.get("AB").unwrap().size(), 2);
}
