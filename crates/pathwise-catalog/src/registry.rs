//! Registry of selectable pathway databases.
//!
//! Built-in entries cover KEGG and GO catalogs for human, mouse and fly under
//! several identifier types. Their locations are relative; they resolve
//! against `catalog.base_url` when one is configured and are otherwise read
//! from the local filesystem.

use pathwise_common::{CatalogConfig, CatalogDatabase, PathwiseError, Result};

use crate::source::{CatalogSource, FileCatalogSource, HttpCatalogSource};

const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    // (id, file, species, id type, collection)
    ("Ensembl_KEGG_HSapiens", "hsapiens.ensembl_gene_id.KEGG.pathways.json", "Homo sapiens", "Ensembl Genes", "KEGG"),
    ("Ensembl_KEGG_MMusculus", "mmusculus.ensembl_gene_id.KEGG.pathways.json", "Mus musculus", "Ensembl Genes", "KEGG"),
    ("Ensembl_KEGG_DMelanogaster", "dmelanogaster.ensembl_gene_id.KEGG.pathways.json", "Drosophila melanogaster", "Ensembl Genes", "KEGG"),
    ("NCBI_KEGG_HSapiens", "hsapiens.ncbi_gene_id.KEGG.pathways.json", "Homo sapiens", "NCBI Genes", "KEGG"),
    ("NCBI_KEGG_MMusculus", "mmusculus.ncbi_gene_id.KEGG.pathways.json", "Mus musculus", "NCBI Genes", "KEGG"),
    ("NCBI_KEGG_DMelanogaster", "dmelanogaster.ncbi_gene_id.KEGG.pathways.json", "Drosophila melanogaster", "NCBI Genes", "KEGG"),
    ("Ensembl_GO_HSapiens", "hsapiens.ensembl_gene_id.GO.pathways.json", "Homo sapiens", "Ensembl Genes", "GO"),
    ("Ensembl_GO_MMusculus", "mmusculus.ensembl_gene_id.GO.pathways.json", "Mus musculus", "Ensembl Genes", "GO"),
    ("Ensembl_GO_DMelanogaster", "dmelanogaster.ensembl_gene_id.GO.pathways.json", "Drosophila melanogaster", "Ensembl Genes", "GO"),
    ("NCBI_GO_HSapiens", "hsapiens.entrezgene_id.GO.pathways.json", "Homo sapiens", "NCBI Genes", "GO"),
    ("NCBI_GO_MMusculus", "mmusculus.entrezgene_id.GO.pathways.json", "Mus musculus", "NCBI Genes", "GO"),
    ("NCBI_GO_DMelanogaster", "dmelanogaster.entrezgene_id.GO.pathways.json", "Drosophila melanogaster", "NCBI Genes", "GO"),
    ("GeneSymbol_GO_HSapiens", "hsapiens.external_gene_name.GO.pathways.json", "Homo sapiens", "GeneSymbol Genes", "GO"),
    ("GeneSymbol_GO_MMusculus", "mmusculus.external_gene_name.GO.pathways.json", "Mus musculus", "GeneSymbol Genes", "GO"),
    ("GeneSymbol_GO_DMelanogaster", "dmelanogaster.external_gene_name.GO.pathways.json", "Drosophila melanogaster", "GeneSymbol Genes", "GO"),
    ("Ensembl_Homology_GO_MMusculus", "mmusculus.ensembl_gene_id.GO.homology_pathways.json", "Mus musculus", "Ensembl Genes", "GO"),
    ("Ensembl_Homology_GO_DMelanogaster", "dmelanogaster.ensembl_gene_id.GO.homology_pathways.json", "Drosophila melanogaster", "Ensembl Genes", "GO"),
];

/// Directory, relative to the base URL or working directory, holding the
/// built-in catalog files.
pub const BUILTIN_CATALOG_DIR: &str = "static/json";

#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    databases: Vec<CatalogDatabase>,
    base_url: Option<String>,
}

impl CatalogRegistry {
    /// Registry holding only the built-in databases.
    pub fn builtin() -> Self {
        let databases = BUILTIN
            .iter()
            .map(|(id, file, species, id_type, collection)| CatalogDatabase {
                id: id.to_string(),
                location: format!("{BUILTIN_CATALOG_DIR}/{file}"),
                species: species.to_string(),
                id_type: id_type.to_string(),
                collection: collection.to_string(),
            })
            .collect();
        Self { databases, base_url: None }
    }

    /// Built-ins overlaid with configured databases. A configured entry with a
    /// built-in id replaces it; new ids are appended.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let mut registry = Self::builtin();
        registry.base_url = config.base_url.clone();
        for db in &config.databases {
            match registry.databases.iter_mut().find(|existing| existing.id == db.id) {
                Some(existing) => *existing = db.clone(),
                None => registry.databases.push(db.clone()),
            }
        }
        registry
    }

    pub fn databases(&self) -> &[CatalogDatabase] {
        &self.databases
    }

    pub fn get(&self, id: &str) -> Option<&CatalogDatabase> {
        self.databases.iter().find(|db| db.id == id)
    }

    /// Resolve a database location to a URL or path.
    pub fn resolve_location(&self, location: &str) -> String {
        if is_remote(location) {
            return location.to_string();
        }
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), location.trim_start_matches('/')),
            None => location.to_string(),
        }
    }

    /// Loader for a registered database.
    pub fn source_for(&self, id: &str) -> Result<Box<dyn CatalogSource>> {
        let db = self.get(id).ok_or_else(|| {
            PathwiseError::CatalogUnavailable(format!("unknown pathway database: {id}"))
        })?;
        Ok(source_for_location(&self.resolve_location(&db.location)))
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// HTTP loader for URLs, file loader for everything else.
pub fn source_for_location(location: &str) -> Box<dyn CatalogSource> {
    if is_remote(location) {
        Box::new(HttpCatalogSource::new(location))
    } else {
        Box::new(FileCatalogSource::new(location))
    }
}
