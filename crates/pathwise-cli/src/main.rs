//! Pathwise — pathway overrepresentation analysis.
//! Entry point for the `pathwise` binary.

mod cli;
mod ids;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use pathwise_catalog::registry::{source_for_location, CatalogRegistry};
use pathwise_catalog::CatalogSource;
use pathwise_common::PathwiseConfig;
use pathwise_engine::export::{detail_file_name, format_p_value, pathway_detail_tsv, summary_tsv};
use pathwise_engine::ranking::display_name;
use pathwise_engine::{AnalysisSession, OutcomeStatus, RankedResults, ResultQuery};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, RunArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pathwise=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Command::Databases => list_databases(&config),
        Command::Run(args) => run(config, args).await,
    }
}

/// Explicit path, then PATHWISE_CONFIG / ./pathwise.toml, then the user
/// config directory. Falls back to defaults when nothing is found.
fn load_config(explicit: Option<&Path>) -> PathwiseConfig {
    let loaded = match explicit {
        Some(path) => PathwiseConfig::load_from(path),
        None => PathwiseConfig::load().or_else(|e| match user_config_path() {
            Some(path) if path.exists() => PathwiseConfig::load_from(&path),
            _ => Err(e),
        }),
    };
    match loaded {
        Ok(config) => {
            info!(
                min = config.restriction.min_pathway_size,
                max = config.restriction.max_pathway_size,
                annotated_background = config.session.annotated_background,
                "Configuration loaded"
            );
            config
        }
        Err(e) => {
            warn!("Could not load pathwise.toml: {e}");
            warn!("Using built-in defaults. Copy pathwise.example.toml to pathwise.toml to customise.");
            PathwiseConfig::default()
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pathwise").join("pathwise.toml"))
}

fn list_databases(config: &PathwiseConfig) -> anyhow::Result<()> {
    let registry = CatalogRegistry::from_config(&config.catalog);
    let default = config.catalog.default_database.as_deref();
    println!("{:<36} {:<26} {:<18} {:<6}", "ID", "SPECIES", "IDENTIFIERS", "SET");
    for db in registry.databases() {
        let marker = if Some(db.id.as_str()) == default { " *" } else { "" };
        println!(
            "{:<36} {:<26} {:<18} {:<6}{}",
            db.id, db.species, db.id_type, db.collection, marker
        );
    }
    Ok(())
}

fn catalog_source(config: &PathwiseConfig, requested: Option<&str>) -> anyhow::Result<Box<dyn CatalogSource>> {
    let registry = CatalogRegistry::from_config(&config.catalog);
    let selected = requested
        .or(config.catalog.default_database.as_deref())
        .context("No catalog given; pass --catalog or set catalog.default_database")?;
    if registry.get(selected).is_some() {
        Ok(registry.source_for(selected)?)
    } else {
        Ok(source_for_location(selected))
    }
}

async fn run(mut config: PathwiseConfig, args: RunArgs) -> anyhow::Result<()> {
    if let Some(annotated) = args.annotated_background {
        config.session.annotated_background = annotated;
    }
    if let Some(page_size) = args.page_size {
        config.ranking.page_size = page_size;
    }
    let max_name_length = config.ranking.max_name_length;
    let page_size = config.ranking.page_size;
    let source = catalog_source(&config, args.catalog.as_deref())?;

    let background = ids::read_ids(&args.background)?;
    let foreground = ids::read_ids(&args.foreground)?;
    info!(background = background.len(), foreground = foreground.len(), "Read identifier files");

    let mut session = AnalysisSession::new(config);
    session.set_background(&background);
    session.load_catalog(source.as_ref()).await?;
    info!(pathways = session.restricted_catalog().len(), "Catalog restricted to background");
    session.set_foreground(&foreground)?;
    session.run()?;

    let ranked = session
        .next_outcome()
        .await
        .context("Analysis scheduler stopped before delivering a result")?;

    let query = ResultQuery::new(page_size)
        .with_search(args.search.clone())
        .with_offset(args.offset);
    print_page(ranked, &query, max_name_length);

    if let Some(path) = &args.export {
        std::fs::write(path, summary_tsv(ranked.results())?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} results to {}", ranked.len(), path.display());
    }

    if let Some(pathway_id) = &args.detail {
        let result = ranked
            .find(pathway_id)
            .with_context(|| format!("Pathway {pathway_id} is not among the scored pathways"))?;
        let path = detail_file_name(pathway_id);
        std::fs::write(&path, pathway_detail_tsv(result, ranked.outcome())?)
            .with_context(|| format!("Failed to write {path}"))?;
        info!("Wrote pathway detail to {path}");
    }

    Ok(())
}

fn print_page(ranked: &RankedResults, query: &ResultQuery, max_name_length: usize) {
    println!(
        "Foreground: {}  Background: {}",
        ranked.foreground_size(),
        ranked.background_size()
    );
    match ranked.status() {
        OutcomeStatus::NoOverlappingAnnotation => {
            println!("No pathway overlaps the background; nothing to compare.");
            return;
        }
        OutcomeStatus::Aborted(reason) => {
            println!("Analysis aborted: {reason}");
            return;
        }
        OutcomeStatus::Enriched => {}
    }

    let page = ranked.query(query);
    if page.total == 0 {
        println!("No pathway matches \"{}\".", query.search);
        return;
    }
    println!("{:<5} {:<width$} {:>12} {:>8} {:>6}", "#", "NAME", "P", "OVERLAP", "SIZE", width = max_name_length);
    for (i, result) in page.items.iter().enumerate() {
        println!(
            "{:<5} {:<width$} {:>12} {:>8} {:>6}",
            page.start + i + 1,
            display_name(result, max_name_length),
            format_p_value(result.p_value),
            result.overlap,
            result.pathway_size,
            width = max_name_length
        );
    }
    println!("Showing {}-{} of {}", page.start + 1, page.end, page.total);
    if page.has_next() {
        println!("Next page: --offset {}", page.next_offset());
    }
}
