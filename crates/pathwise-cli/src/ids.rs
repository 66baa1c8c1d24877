//! Identifier list files.

use std::path::Path;

use anyhow::Context;

/// One identifier per line. Blank lines and `#` comments are skipped.
pub fn read_ids(path: &Path) -> anyhow::Result<Vec<String>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read identifier file {}", path.display()))?;
    Ok(parse_ids(&body))
}

pub fn parse_ids(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
