#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_restriction_bounds() {
        let r = RestrictionConfig::default();
        assert_eq!(r.min_pathway_size, 10);
        assert_eq!(r.max_pathway_size, 10_000);
        assert!(!r.contains(9));
        assert!(r.contains(10));
        assert!(r.contains(10_000));
        assert!(!r.contains(10_001));
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = PathwiseConfig::from_toml_str("").unwrap();
        assert!(config.session.annotated_background);
        assert!(!config.session.continuous);
        assert_eq!(config.ranking.page_size, 10);
        assert_eq!(config.ranking.max_name_length, 45);
        assert!(config.catalog.databases.is_empty());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = PathwiseConfig::from_toml_str(
            r#"
            [restriction]
            min_pathway_size = 1

            [session]
            continuous = true

            [[catalog.databases]]
            id = "local_kegg"
            location = "./kegg.json"
            collection = "KEGG"
            "#,
        )
        .unwrap();
        assert_eq!(config.restriction.min_pathway_size, 1);
        assert_eq!(config.restriction.max_pathway_size, 10_000);
        assert!(config.session.continuous);
        assert!(config.session.annotated_background);
        assert_eq!(config.catalog.databases.len(), 1);
        assert_eq!(config.catalog.databases[0].species, "");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = PathwiseConfig::from_toml_str(
            "[restriction]\nmin_pathway_size = 50\nmax_pathway_size = 5\n",
        )
        .unwrap_err();
        assert!(matches!(err, PathwiseError::Config(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = PathwiseConfig::from_toml_str("[ranking]\npage_size = 0\n").unwrap_err();
        assert!(matches!(err, PathwiseError::Config(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = PathwiseConfig::load_from(Path::new("/definitely/not/here/pathwise.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ranking]\npage_size = 25").unwrap();
        let config = PathwiseConfig::load_from(file.path()).unwrap();
        assert_eq!(config.ranking.page_size, 25);
    }
}
