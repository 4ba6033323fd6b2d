//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - constructed once per run and shared read-only across all fits
//! - exported to JSON alongside fit records
//! - built synthetically in tests without touching the filesystem

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Synthetic stellar model families.
///
/// Each family ships as one precomputed magnitude-grid file with its own
/// filter catalog. The spellings used in configuration files (and on the
/// command line) are the historical ones: `Kurucz`, `Phoenix`, `blackbody`,
/// `BOSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ModelFamily {
    #[serde(rename = "Kurucz")]
    #[value(name = "Kurucz")]
    Kurucz,
    #[serde(rename = "Phoenix")]
    #[value(name = "Phoenix")]
    Phoenix,
    #[serde(rename = "blackbody")]
    #[value(name = "blackbody")]
    Blackbody,
    #[serde(rename = "BOSZ")]
    #[value(name = "BOSZ")]
    Bosz,
}

impl ModelFamily {
    /// Grid file name for this family.
    pub fn grid_file_name(self) -> &'static str {
        match self {
            ModelFamily::Kurucz => "magslist_old_kurucz.new",
            ModelFamily::Phoenix => "magslist_phoenix_grid.new",
            ModelFamily::Blackbody => "magslist_blackbody.new",
            ModelFamily::Bosz => "magslist_bosz_normal.new",
        }
    }

    /// Number of filters in this family's catalog (and grid columns).
    ///
    /// The Phoenix grid omits long-wavelength source filters and carries a
    /// smaller catalog than the full-range families.
    pub fn filter_count(self) -> usize {
        match self {
            ModelFamily::Phoenix => 121,
            _ => 142,
        }
    }

    /// Size of the JWST target block at the head of every catalog
    /// (12 NIRISS + 2 Guider + 29 NIRCam + 9 MIRI + 7 NIRSpec).
    pub fn jwst_block(self) -> usize {
        59
    }

    /// The spelling used in configuration files.
    pub fn config_name(self) -> &'static str {
        match self {
            ModelFamily::Kurucz => "Kurucz",
            ModelFamily::Phoenix => "Phoenix",
            ModelFamily::Blackbody => "blackbody",
            ModelFamily::Bosz => "BOSZ",
        }
    }
}

/// Whether an observation column holds magnitudes or colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Magnitude,
    Colour,
}

/// Which source magnitude the fit's dependent colour is anchored to.
///
/// The fit always models X = m1 − m2 against Y = m_a − target; `YAxis`
/// selects whether m_a is the first or the second source filter. The
/// configuration key `yvalue` is 1-based: 1 → `Mag1`, 2 → `Mag2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    Mag1,
    Mag2,
}

impl YAxis {
    /// Map the 1-based `yvalue` configuration value.
    pub fn from_yvalue(value: i64) -> Option<Self> {
        match value {
            1 => Some(YAxis::Mag1),
            2 => Some(YAxis::Mag2),
            _ => None,
        }
    }
}

/// Per-filter calibration constants from the grid file descriptor lines.
///
/// Informational only: none of these enter the fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Effective wavelength in microns.
    pub wavelength_um: f64,
    /// Zero-magnitude flux density in W/m²/µm.
    pub flux_w: f64,
    /// Zero-magnitude flux density in Jy.
    pub flux_jy: f64,
}

/// One filter catalog entry.
///
/// Labels keep the trailing space produced by the grid-file tokenization;
/// output headers and substring matching both rely on the verbatim text.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub label: String,
    pub parameters: FilterParameters,
}

/// An immutable synthetic-photometry dataset: one model family's filter
/// catalog plus its magnitude grid (rows = synthetic stars, columns =
/// filters, aligned with the catalog).
///
/// Constructed once per run by the grid loader and shared read-only by
/// every fit.
#[derive(Debug, Clone)]
pub struct ModelDataset {
    family: ModelFamily,
    filters: Vec<FilterEntry>,
    grid: DMatrix<f64>,
}

impl ModelDataset {
    /// Build a dataset. `grid` must have one column per catalog entry.
    pub fn new(family: ModelFamily, filters: Vec<FilterEntry>, grid: DMatrix<f64>) -> Self {
        debug_assert_eq!(filters.len(), grid.ncols());
        Self {
            family,
            filters,
            grid,
        }
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn filters(&self) -> &[FilterEntry] {
        &self.filters
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn star_count(&self) -> usize {
        self.grid.nrows()
    }

    /// Catalog label for a column index.
    pub fn label(&self, index: usize) -> &str {
        &self.filters[index].label
    }

    /// Magnitudes of every synthetic star in one filter.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.grid.column(index).iter().copied().collect()
    }

    /// Number of leading catalog entries that are JWST target filters.
    ///
    /// Capped by the catalog size so reduced synthetic datasets stay usable.
    pub fn jwst_block(&self) -> usize {
        self.family.jwst_block().min(self.filters.len())
    }

    /// Resolve a requested filter name to a catalog index.
    ///
    /// Case-sensitive substring containment over the catalog labels; when
    /// several entries contain the request, the last one wins (a warning
    /// names the winner so ambiguous requests are visible). Returns `None`
    /// when nothing matches.
    pub fn match_filter(&self, requested: &str) -> Option<usize> {
        let mut found = None;
        let mut hits = 0usize;
        for (i, entry) in self.filters.iter().enumerate() {
            if entry.label.contains(requested) {
                found = Some(i);
                hits += 1;
            }
        }
        if hits > 1 {
            if let Some(i) = found {
                log::warn!(
                    "filter '{requested}' matches {hits} catalog entries; using the last match '{}'",
                    self.filters[i].label.trim_end()
                );
            }
        }
        found
    }
}

/// A full batch run's configuration as understood by the pipeline.
///
/// This is the validated form of the TOML configuration file: column
/// indices are 0-based, filter names have underscores mapped to spaces,
/// and the fit order has passed the batch floor check.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub family: ModelFamily,

    /// Source filter names, resolved against the family catalog.
    pub filter1: String,
    pub filter2: String,

    /// 0-based observation-table columns for the two inputs.
    pub column1: usize,
    pub column2: usize,
    pub column1_kind: ColumnKind,
    pub column2_kind: ColumnKind,

    /// Fit axis selection (`yvalue`).
    pub y_axis: YAxis,

    pub datafile: PathBuf,

    /// 0-based RA/Dec passthrough columns; `None` disables passthrough.
    pub ra_column: Option<usize>,
    pub dec_column: Option<usize>,

    /// Target filter names (`jwst1`/`jwst2`).
    pub target1: String,
    pub target2: String,

    /// Legendre fit order; batch validation enforces >= 2.
    pub fit_order: usize,

    pub out_path: PathBuf,
}

/// Portable record of a fitting run, written as JSON.
///
/// Carries everything needed to reapply or inspect the transformations
/// without the model grids: the run's provenance and one
/// [`TransformRecord`] per fitted target filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformsFile {
    pub tool: String,
    pub created: DateTime<Utc>,
    pub family: ModelFamily,
    pub source1: String,
    pub source2: String,
    pub y_axis: YAxis,
    pub order: usize,
    pub records: Vec<TransformRecord>,
}

/// One fitted transformation in portable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRecord {
    pub target: String,
    /// Position of the target in the family's filter catalog.
    pub index: usize,
    /// Legendre series coefficients, constant term first.
    pub coefficients: Vec<f64>,
    /// Colour domain the fit was built on.
    pub domain: [f64; 2],
    pub rms: f64,
    pub min_abs_residual: f64,
    pub max_abs_residual: f64,
    /// Precomputed curve for quick plotting, sampled a little past the
    /// fitted domain on both sides.
    pub curve: TransformCurve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Build a dataset from labels and per-filter magnitude columns.
    pub fn dataset(family: ModelFamily, labels: &[&str], columns: &[Vec<f64>]) -> ModelDataset {
        assert_eq!(labels.len(), columns.len());
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut grid = DMatrix::zeros(rows, columns.len());
        for (j, col) in columns.iter().enumerate() {
            for (i, &v) in col.iter().enumerate() {
                grid[(i, j)] = v;
            }
        }
        let filters = labels
            .iter()
            .map(|&l| FilterEntry {
                label: l.to_string(),
                parameters: FilterParameters {
                    wavelength_um: 1.0,
                    flux_w: 1e-9,
                    flux_jy: 1000.0,
                },
            })
            .collect();
        ModelDataset::new(family, filters, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_constants() {
        assert_eq!(ModelFamily::Kurucz.grid_file_name(), "magslist_old_kurucz.new");
        assert_eq!(ModelFamily::Blackbody.grid_file_name(), "magslist_blackbody.new");
        assert_eq!(ModelFamily::Kurucz.filter_count(), 142);
        assert_eq!(ModelFamily::Phoenix.filter_count(), 121);
        assert_eq!(ModelFamily::Bosz.filter_count(), 142);
        assert_eq!(ModelFamily::Phoenix.jwst_block(), 59);
        assert_eq!(ModelFamily::Blackbody.config_name(), "blackbody");
    }

    #[test]
    fn yaxis_maps_one_based_yvalue() {
        assert_eq!(YAxis::from_yvalue(1), Some(YAxis::Mag1));
        assert_eq!(YAxis::from_yvalue(2), Some(YAxis::Mag2));
        assert_eq!(YAxis::from_yvalue(0), None);
        assert_eq!(YAxis::from_yvalue(3), None);
    }

    #[test]
    fn match_filter_substring_and_sentinel() {
        let ds = testutil::dataset(
            ModelFamily::Kurucz,
            &["Johnson B  ", "Johnson V  "],
            &[vec![1.0, 2.0], vec![0.5, 1.5]],
        );
        assert_eq!(ds.match_filter("Johnson V"), Some(1));
        assert_eq!(ds.match_filter("Johnson B"), Some(0));
        assert_eq!(ds.match_filter("Sloan g"), None);
    }

    #[test]
    fn match_filter_last_match_wins() {
        // "NIRCam F150W" is a substring of both entries; the scan keeps the
        // later index.
        let ds = testutil::dataset(
            ModelFamily::Kurucz,
            &["NIRCam F150W ", "NIRCam F150W2 "],
            &[vec![1.0], vec![2.0]],
        );
        assert_eq!(ds.match_filter("NIRCam F150W"), Some(1));
        assert_eq!(ds.match_filter("NIRCam F150W2"), Some(1));
    }

    #[test]
    fn jwst_block_caps_at_catalog_size() {
        let ds = testutil::dataset(
            ModelFamily::Kurucz,
            &["A ", "B ", "C "],
            &[vec![1.0], vec![2.0], vec![3.0]],
        );
        assert_eq!(ds.jwst_block(), 3);
    }

    #[test]
    fn dataset_column_extraction() {
        let ds = testutil::dataset(
            ModelFamily::Phoenix,
            &["A ", "B "],
            &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        );
        assert_eq!(ds.star_count(), 3);
        assert_eq!(ds.column(1), vec![4.0, 5.0, 6.0]);
        assert_eq!(ds.label(0), "A ");
    }
}
