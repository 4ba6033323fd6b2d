//! Observed photometry catalogs.
//!
//! The data file is whitespace-delimited text, or comma-delimited when the
//! file name ends in `.csv`. Lines starting with `#`, `\` or `|` are
//! comments, and in text files everything after one of those characters is
//! dropped. Magnitude columns are parsed as floats; RA/Dec columns are
//! carried as verbatim strings so sexagesimal coordinates survive untouched.

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// Characters that introduce a comment in a data file.
const COMMENT_CHARS: [char; 3] = ['#', '\\', '|'];

/// Observed rows: two magnitude (or colour) columns plus optional positions.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    pub mag1: Vec<f64>,
    pub mag2: Vec<f64>,
    /// Verbatim (RA, Dec) strings, present only when both columns were
    /// configured and readable on every row.
    pub positions: Option<Vec<(String, String)>>,
}

impl ObservationTable {
    pub fn len(&self) -> usize {
        self.mag1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mag1.is_empty()
    }
}

struct RawRow {
    line: usize,
    fields: Vec<String>,
}

/// Read the observed catalog, extracting the two configured magnitude
/// columns and, when configured, the RA/Dec strings.
///
/// Column indices are 0-based here; the configuration layer has already
/// shifted them. A missing or unparsable magnitude is fatal. Unreadable
/// RA/Dec columns only drop the positions, with a warning.
pub fn read_observations(
    path: &Path,
    col1: usize,
    col2: usize,
    ra_col: Option<usize>,
    dec_col: Option<usize>,
) -> Result<ObservationTable, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::data(format!(
            "Failed to open data file '{}': {e}",
            path.display()
        ))
    })?;

    let rows = if is_csv(path) {
        parse_csv_rows(&text, path)?
    } else {
        parse_text_rows(&text)
    };
    if rows.is_empty() {
        return Err(AppError::data(format!(
            "Data file '{}' contains no data rows",
            path.display()
        )));
    }

    let mut mag1 = Vec::with_capacity(rows.len());
    let mut mag2 = Vec::with_capacity(rows.len());
    for row in &rows {
        mag1.push(numeric_field(row, col1, path)?);
        mag2.push(numeric_field(row, col2, path)?);
    }

    let positions = match (ra_col, dec_col) {
        (Some(ra), Some(dec)) => extract_positions(&rows, ra, dec, path),
        _ => None,
    };

    log::info!(
        "read {} observation rows from '{}'",
        rows.len(),
        path.display()
    );
    Ok(ObservationTable {
        mag1,
        mag2,
        positions,
    })
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Text rows: strip from the first comment character, split on whitespace.
fn parse_text_rows(text: &str) -> Vec<RawRow> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let data = match raw.find(COMMENT_CHARS) {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let fields: Vec<String> = data.split_whitespace().map(str::to_string).collect();
        if fields.is_empty() {
            continue;
        }
        rows.push(RawRow {
            line: idx + 1,
            fields,
        });
    }
    rows
}

/// CSV rows: drop whole comment lines, then hand the rest to the CSV parser.
fn parse_csv_rows(text: &str, path: &Path) -> Result<Vec<RawRow>, AppError> {
    let mut kept = String::new();
    let mut line_numbers = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() || raw.starts_with(COMMENT_CHARS) {
            continue;
        }
        kept.push_str(raw);
        kept.push('\n');
        line_numbers.push(idx + 1);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(kept.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            AppError::data(format!("Failed to parse CSV '{}': {e}", path.display()))
        })?;
        rows.push(RawRow {
            line: line_numbers.get(i).copied().unwrap_or(i + 1),
            fields: record.iter().map(str::to_string).collect(),
        });
    }
    Ok(rows)
}

fn numeric_field(row: &RawRow, col: usize, path: &Path) -> Result<f64, AppError> {
    let Some(token) = row.fields.get(col) else {
        return Err(AppError::data(format!(
            "Line {} of '{}' has {} columns, magnitude column {} is out of range",
            row.line,
            path.display(),
            row.fields.len(),
            col + 1
        )));
    };
    let value: f64 = token.parse().map_err(|_| {
        AppError::data(format!(
            "Cannot parse magnitude '{token}' at line {} column {} of '{}'",
            row.line,
            col + 1,
            path.display()
        ))
    })?;
    if !value.is_finite() {
        return Err(AppError::data(format!(
            "Non-finite magnitude '{token}' at line {} column {} of '{}'",
            row.line,
            col + 1,
            path.display()
        )));
    }
    Ok(value)
}

fn extract_positions(
    rows: &[RawRow],
    ra: usize,
    dec: usize,
    path: &Path,
) -> Option<Vec<(String, String)>> {
    let mut positions = Vec::with_capacity(rows.len());
    for row in rows {
        match (row.fields.get(ra), row.fields.get(dec)) {
            (Some(r), Some(d)) => positions.push((r.clone(), d.clone())),
            _ => {
                log::warn!(
                    "cannot read RA/Dec from columns {} and {} of '{}'; positions will not be written",
                    ra + 1,
                    dec + 1,
                    path.display()
                );
                return None;
            }
        }
    }
    Some(positions)
}
