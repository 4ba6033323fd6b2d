//! Model grid loading.
//!
//! Grid files are plain text with a rigid layout:
//!
//! - 5 header lines (discarded)
//! - one descriptor line per filter: `# <index> <label tokens...> <wavelength> <flux W/m²/µm> <flux Jy>`
//! - a numeric body with one leading non-magnitude column followed by one
//!   magnitude column per filter
//!
//! Header and descriptor lines start with `#`, so the body can be parsed as
//! a whole-file numeric load that skips comments. The loader drops the
//! body's leading column so grid column `i` lines up with catalog entry `i`.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::DMatrix;
use thiserror::Error;

use crate::domain::{FilterEntry, FilterParameters, ModelDataset, ModelFamily};
use crate::error::AppError;

/// Discarded lines at the top of every grid file.
const HEADER_LINES: usize = 5;

/// Why a model grid could not be loaded.
///
/// Callers treat any of these as "family unavailable", but the variants let
/// them report the cause precisely (a missing file is an installation
/// problem; a format mismatch usually means the wrong `modelset`).
#[derive(Debug, Error)]
pub enum GridError {
    #[error("model grid '{path}' is missing or unreadable: {source}")]
    FileMissing {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("model grid '{path}' does not match the expected format: {detail}")]
    FormatMismatch { path: PathBuf, detail: String },
    #[error("model grid '{path}' line {line}: {detail}")]
    NumericParse {
        path: PathBuf,
        line: usize,
        detail: String,
    },
}

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        AppError::data(format!("{err}"))
    }
}

/// Locate the directory holding the per-family grid files.
///
/// Priority: explicit `--models-dir` flag, then the
/// `SIMULATED_MAGNITUDES_PATH` environment variable (a `.env` file is
/// honoured), then the current directory.
pub fn resolve_models_dir(flag: Option<&Path>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    dotenvy::dotenv().ok();
    match std::env::var("SIMULATED_MAGNITUDES_PATH") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("."),
    }
}

/// Load one family's dataset from its grid file under `models_dir`.
pub fn load_model_dataset(family: ModelFamily, models_dir: &Path) -> Result<ModelDataset, GridError> {
    let path = models_dir.join(family.grid_file_name());
    let (filters, grid) = load_grid_file(&path, family.filter_count())?;
    log::info!(
        "loaded {} grid: {} synthetic stars x {} filters",
        family.config_name(),
        grid.nrows(),
        filters.len()
    );
    Ok(ModelDataset::new(family, filters, grid))
}

/// Parse a grid file with a known filter count.
///
/// Returns the filter catalog and the magnitude matrix (leading body column
/// already dropped).
pub fn load_grid_file(
    path: &Path,
    expected_filters: usize,
) -> Result<(Vec<FilterEntry>, DMatrix<f64>), GridError> {
    let text = fs::read_to_string(path).map_err(|e| GridError::FileMissing {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut lines = text.lines();

    for n in 0..HEADER_LINES {
        if lines.next().is_none() {
            return Err(GridError::FormatMismatch {
                path: path.to_path_buf(),
                detail: format!("file ends inside the {HEADER_LINES}-line header (read {n})"),
            });
        }
    }

    let mut filters = Vec::with_capacity(expected_filters);
    for i in 0..expected_filters {
        let Some(line) = lines.next() else {
            return Err(GridError::FormatMismatch {
                path: path.to_path_buf(),
                detail: format!(
                    "expected {expected_filters} filter descriptor lines, file ends after {i}"
                ),
            });
        };
        filters.push(parse_descriptor(line, HEADER_LINES + i + 1, path)?);
    }

    let grid = parse_numeric_body(&text, expected_filters, path)?;
    Ok((filters, grid))
}

/// Parse one filter descriptor line.
///
/// The label is tokens `[2..len-3]` joined with single trailing spaces, with
/// every literal `filter`/`Filter` removed; the last three tokens are the
/// filter parameters.
fn parse_descriptor(line: &str, line_no: usize, path: &Path) -> Result<FilterEntry, GridError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let m = tokens.len();
    if m < 5 {
        return Err(GridError::FormatMismatch {
            path: path.to_path_buf(),
            detail: format!("descriptor line {line_no} has {m} tokens, expected at least 5"),
        });
    }

    let mut label = String::new();
    for t in &tokens[2..m - 3] {
        label.push_str(t);
        label.push(' ');
    }
    let label = label.replace("filter", "").replace("Filter", "");

    let mut params = [0.0f64; 3];
    for (slot, tok) in params.iter_mut().zip(&tokens[m - 3..]) {
        *slot = tok.parse().map_err(|_| GridError::NumericParse {
            path: path.to_path_buf(),
            line: line_no,
            detail: format!("cannot parse filter parameter '{tok}'"),
        })?;
    }

    Ok(FilterEntry {
        label,
        parameters: FilterParameters {
            wavelength_um: params[0],
            flux_w: params[1],
            flux_jy: params[2],
        },
    })
}

/// Whole-file numeric load of the magnitude body.
///
/// Everything after a `#` is comment; blank lines are skipped. Each data row
/// must carry `expected_filters + 1` finite values. The leading column is
/// dropped.
fn parse_numeric_body(
    text: &str,
    expected_filters: usize,
    path: &Path,
) -> Result<DMatrix<f64>, GridError> {
    let expected_cols = expected_filters + 1;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let data = raw.split('#').next().unwrap_or("");
        let tokens: Vec<&str> = data.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != expected_cols {
            return Err(GridError::FormatMismatch {
                path: path.to_path_buf(),
                detail: format!(
                    "body line {line_no} has {} columns, expected {expected_cols}",
                    tokens.len()
                ),
            });
        }
        let mut row = Vec::with_capacity(expected_cols);
        for tok in tokens {
            let value: f64 = tok.parse().map_err(|_| GridError::NumericParse {
                path: path.to_path_buf(),
                line: line_no,
                detail: format!("cannot parse magnitude '{tok}'"),
            })?;
            if !value.is_finite() {
                return Err(GridError::NumericParse {
                    path: path.to_path_buf(),
                    line: line_no,
                    detail: format!("non-finite magnitude '{tok}'"),
                });
            }
            row.push(value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(GridError::FormatMismatch {
            path: path.to_path_buf(),
            detail: "no numeric body rows".to_string(),
        });
    }

    let mut grid = DMatrix::zeros(rows.len(), expected_filters);
    for (i, row) in rows.iter().enumerate() {
        // Column 0 of the body is not a magnitude.
        for j in 0..expected_filters {
            grid[(i, j)] = row[j + 1];
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "jwstmag-grid-{name}-{}.new",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    const GRID_3: &str = "\
# test grid
# header 2
# header 3
# header 4
# header 5
#  1 NIRISS F090W filter  0.902 2.92e-10 2249.0
#  2 Johnson V filter  0.545 3.735e-08 3631.0
#  3 2MASS Ks filter  2.159 4.283e-10 666.7
 1.0 10.0 11.0 12.0
 2.0 10.5 11.8 13.1
";

    #[test]
    fn loads_labels_parameters_and_body() {
        let path = fixture("ok", GRID_3);
        let (filters, grid) = load_grid_file(&path, 3).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(filters.len(), 3);
        // "filter" is stripped, trailing spaces survive tokenization.
        assert_eq!(filters[0].label, "NIRISS F090W  ");
        assert_eq!(filters[1].label, "Johnson V  ");
        assert_eq!(filters[2].label, "2MASS Ks  ");
        assert!((filters[1].parameters.wavelength_um - 0.545).abs() < 1e-12);
        assert!((filters[2].parameters.flux_jy - 666.7).abs() < 1e-12);

        // Leading body column dropped: 2 stars x 3 filters.
        assert_eq!(grid.nrows(), 2);
        assert_eq!(grid.ncols(), 3);
        assert!((grid[(0, 0)] - 10.0).abs() < 1e-12);
        assert!((grid[(1, 2)] - 13.1).abs() < 1e-12);
    }

    #[test]
    fn missing_file_is_its_own_variant() {
        let err = load_grid_file(Path::new("/nonexistent/magslist.new"), 3).unwrap_err();
        assert!(matches!(err, GridError::FileMissing { .. }), "{err}");
    }

    #[test]
    fn truncated_descriptor_block_is_format_mismatch() {
        let truncated: String = GRID_3.lines().take(7).collect::<Vec<_>>().join("\n");
        let path = fixture("trunc", &truncated);
        let err = load_grid_file(&path, 3).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, GridError::FormatMismatch { .. }), "{err}");
    }

    #[test]
    fn non_numeric_body_is_numeric_parse() {
        let broken = GRID_3.replace("11.8", "abc");
        let path = fixture("nan", &broken);
        let err = load_grid_file(&path, 3).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, GridError::NumericParse { line: 10, .. }), "{err}");
    }

    #[test]
    fn wrong_body_width_is_format_mismatch() {
        let narrow = GRID_3.replace(" 1.0 10.0 11.0 12.0", " 1.0 10.0 11.0");
        let path = fixture("width", &narrow);
        let err = load_grid_file(&path, 3).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, GridError::FormatMismatch { .. }), "{err}");
    }

    #[test]
    fn dataset_wires_family_and_labels() {
        let dir = std::env::temp_dir().join(format!("jwstmag-models-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // The loader expects the family's real filter count, so build a
        // Kurucz-sized file: 142 descriptors and a 143-column body.
        let mut contents = String::from("# h1\n# h2\n# h3\n# h4\n# h5\n");
        for i in 0..142 {
            contents.push_str(&format!(
                "#  {} Band {i:03} filter  1.0 1.0e-9 1000.0\n",
                i + 1
            ));
        }
        for star in 0..2 {
            let mut row = format!("{}.0", star + 1);
            for j in 0..142 {
                row.push_str(&format!(" {}", 10.0 + star as f64 + j as f64 * 0.01));
            }
            row.push('\n');
            contents.push_str(&row);
        }
        fs::write(dir.join("magslist_old_kurucz.new"), contents).unwrap();

        let ds = load_model_dataset(ModelFamily::Kurucz, &dir).unwrap();
        fs::remove_file(dir.join("magslist_old_kurucz.new")).ok();
        fs::remove_dir(&dir).ok();

        assert_eq!(ds.family(), ModelFamily::Kurucz);
        assert_eq!(ds.filter_count(), 142);
        assert_eq!(ds.star_count(), 2);
        assert_eq!(ds.label(0), "Band 000  ");
        assert_eq!(ds.match_filter("Band 141"), Some(141));
    }

    #[test]
    fn models_dir_flag_wins() {
        let dir = resolve_models_dir(Some(Path::new("/data/models")));
        assert_eq!(dir, PathBuf::from("/data/models"));
    }
}
