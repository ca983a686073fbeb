//! Span file loading

use std::path::Path;

use anyhow::{Context, Result};
use shop_trace::SpanRecord;
use tracing::warn;

/// Load all span records from a JSON-lines file.
///
/// Lines that do not parse are skipped with a warning; a half-written
/// tail from a killed service must not hide the rest of the file.
pub fn load_spans(path: &Path) -> Result<Vec<SpanRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read span file {}", path.display()))?;

    let mut spans = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SpanRecord>(line) {
            Ok(span) => spans.push(span),
            Err(e) => warn!("Skipping unparseable line {}: {}", number + 1, e),
        }
    }

    Ok(spans)
}
