//! Tab-separated downloads: the ranked summary and a per-pathway detail file.

use csv::WriterBuilder;
use pathwise_common::{PathwiseError, Result};

use crate::outcome::{AnalysisOutcome, EnrichmentResult};

pub const SUMMARY_FILE_NAME: &str = "pathway_results.txt";

pub const SUMMARY_COLUMNS: [&str; 8] = [
    "pathway",
    "name",
    "url",
    "p",
    "overlap",
    "pathway_size",
    "foreground_size",
    "background_size",
];

/// File name used for the detail download of one pathway.
pub fn detail_file_name(pathway_id: &str) -> String {
    format!("pathway_results.{pathway_id}.txt")
}

/// Scientific notation below 1e-4, plain decimal otherwise.
pub fn format_p_value(p: f64) -> String {
    if p > 0.0 && p < 1e-4 {
        format!("{p:e}")
    } else {
        format!("{p}")
    }
}

fn record_fields(result: &EnrichmentResult) -> [String; 8] {
    [
        result.pathway_id.clone(),
        result.name.clone(),
        result.url.clone(),
        format_p_value(result.p_value),
        result.overlap.to_string(),
        result.pathway_size.to_string(),
        result.foreground_size.to_string(),
        result.background_size.to_string(),
    ]
}

fn tsv_writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| PathwiseError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One summary record, without a line terminator.
pub fn result_record(result: &EnrichmentResult) -> Result<String> {
    let mut writer = tsv_writer();
    writer.write_record(record_fields(result))?;
    let mut line = finish(writer)?;
    line.truncate(line.trim_end_matches('\n').len());
    Ok(line)
}

/// Header row followed by one record per result, in the order given.
pub fn summary_tsv<'a, I>(results: I) -> Result<String>
where
    I: IntoIterator<Item = &'a EnrichmentResult>,
{
    let mut writer = tsv_writer();
    writer.write_record(SUMMARY_COLUMNS)?;
    for result in results {
        writer.write_record(record_fields(result))?;
    }
    finish(writer)
}

/// Key/value rows describing one pathway against the outcome it was scored
/// in, followed by the member, foreground and intersection lists.
pub fn pathway_detail_tsv(result: &EnrichmentResult, outcome: &AnalysisOutcome) -> Result<String> {
    let pathway = outcome.catalog.get(&result.pathway_id).ok_or_else(|| {
        PathwiseError::invalid(format!(
            "pathway {} is not part of request {}",
            result.pathway_id, outcome.request_id
        ))
    })?;
    let intersection = pathway.features.intersection(&outcome.foreground);

    let mut writer = tsv_writer();
    writer.write_record(["pathway", result.pathway_id.as_str()])?;
    writer.write_record(["pathway_name", result.name.as_str()])?;
    writer.write_record(["pathway_url", result.url.as_str()])?;
    writer.write_record(["pathway_size", result.pathway_size.to_string().as_str()])?;
    writer.write_record(["foreground_size", result.foreground_size.to_string().as_str()])?;
    writer.write_record(["background_size", result.background_size.to_string().as_str()])?;

    for (key, set) in [
        ("pathway", &pathway.features),
        ("foreground", &*outcome.foreground),
        ("intersection", &intersection),
    ] {
        writer.write_record(std::iter::once(key).chain(set.sorted()))?;
    }
    finish(writer)
}
