//! CSV ingest.
//!
//! Turns a CSV with `x` and `y` columns into a [`SampleSet`]. Rules:
//! - header names are trimmed, lowercased and stripped of a UTF-8 BOM
//! - extra columns are ignored
//! - every row must parse: row order defines the parameter position of each
//!   sample, so skipping a bad row would silently shift every later sample
//! - no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::SampleSet;
use crate::error::FitError;

/// Load the samples at `path`.
pub fn load_samples(path: &Path) -> Result<SampleSet, FitError> {
    let unavailable = |reason: String| FitError::InputUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| unavailable(format!("failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let x_idx = require_column(&header_map, path, "x")?;
    let y_idx = require_column(&header_map, path, "y")?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| unavailable(format!("line {line}: CSV parse error: {e}")))?;
        xs.push(parse_cell(&record, x_idx, line, "x")?);
        ys.push(parse_cell(&record, y_idx, line, "y")?);
    }

    debug!(path = %path.display(), rows = xs.len(), "loaded samples");
    SampleSet::from_observations(xs, ys)
}

/// Like [`load_samples`], but reports failure as absent data.
///
/// The error is logged so the caller can simply skip the run.
pub fn try_load_samples(path: &Path) -> Option<SampleSet> {
    match load_samples(path) {
        Ok(samples) => Some(samples),
        Err(err) => {
            warn!(%err, "no data loaded");
            None
        }
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate names.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn require_column(header_map: &HashMap<String, usize>, path: &Path, column: &'static str) -> Result<usize, FitError> {
    header_map.get(column).copied().ok_or_else(|| FitError::MissingColumn {
        path: path.to_path_buf(),
        column,
    })
}

fn parse_cell(record: &StringRecord, idx: usize, line: usize, column: &'static str) -> Result<f64, FitError> {
    let raw = record.get(idx).unwrap_or("");
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FitError::InvalidValue {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}
