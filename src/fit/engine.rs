//! Legendre colour-colour fits.
//!
//! For source columns m1, m2 and a target column T the engine fits
//! Y = P(X) over the model grid, with X = m1 - m2 and Y = m1 - T (axis 1)
//! or Y = m2 - T (axis 2). The polynomial is expressed in the Legendre
//! basis over the natural domain of X, which stays well conditioned at
//! higher orders where a plain power basis would not.
//!
//! Evaluation outside [min X, max X] is clamped to the boundary value.
//! That caps extrapolation blow-up but returns a flat value for stars
//! bluer or redder than the model grid, a known accuracy limit.

use thiserror::Error;

use crate::domain::{ModelDataset, YAxis};
use crate::error::AppError;
use crate::math::{legfit, legval};

/// Order used when the requested order is unusable.
const FALLBACK_ORDER: usize = 4;
/// Smallest usable fit order.
const MIN_ORDER: usize = 2;

/// Why a single-target fit could not be produced.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("cannot fit: degenerate independent variable")]
    DegenerateDomain,
    #[error("least-squares solve failed for target '{target}'")]
    Singular { target: String },
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::fit(format!("{err}"))
    }
}

/// One fitted colour transformation, including its quality numbers.
#[derive(Debug, Clone)]
pub struct FitRecord {
    /// Catalog index of the target filter.
    pub target_index: usize,
    /// Catalog label of the target filter, verbatim.
    pub target_label: String,
    /// Legendre series coefficients, constant term first.
    pub coefficients: Vec<f64>,
    /// Colour domain the fit was built on.
    pub domain: (f64, f64),
    pub rms: f64,
    pub min_abs_residual: f64,
    pub max_abs_residual: f64,
}

impl FitRecord {
    /// Evaluate the fit at `x`, clamped to the fitted colour domain.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (lo, hi) = self.domain;
        legval(x.clamp(lo, hi), &self.coefficients)
    }
}

/// Floor the requested order, falling back to 4 with a warning.
///
/// Batch configuration validation rejects orders below 2 up front, so the
/// fallback only fires for direct engine callers.
pub fn normalize_order(requested: usize) -> usize {
    if requested < MIN_ORDER {
        log::warn!("bad fit order {requested}, putting the value to {FALLBACK_ORDER}");
        FALLBACK_ORDER
    } else {
        requested
    }
}

/// Fit the transformation from the source colour to one target filter.
pub fn fit_target(
    dataset: &ModelDataset,
    source1: usize,
    source2: usize,
    target: usize,
    axis: YAxis,
    order: usize,
) -> Result<FitRecord, FitError> {
    let order = normalize_order(order);
    let m1 = dataset.column(source1);
    let m2 = dataset.column(source2);
    let t = dataset.column(target);

    let x: Vec<f64> = m1.iter().zip(&m2).map(|(a, b)| a - b).collect();
    let y: Vec<f64> = match axis {
        YAxis::Mag1 => m1.iter().zip(&t).map(|(a, b)| a - b).collect(),
        YAxis::Mag2 => m2.iter().zip(&t).map(|(a, b)| a - b).collect(),
    };

    let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // The min/max fold skips NaN, so non-finite samples need their own check.
    let finite = x.iter().chain(y.iter()).all(|v| v.is_finite());
    if !finite || !(hi > lo) {
        return Err(FitError::DegenerateDomain);
    }

    let coefficients = legfit(&x, &y, order).ok_or_else(|| FitError::Singular {
        target: dataset.label(target).trim_end().to_string(),
    })?;

    let mut sum_sq = 0.0;
    let mut min_abs = f64::INFINITY;
    let mut max_abs = 0.0f64;
    for (&xi, &yi) in x.iter().zip(&y) {
        let r = legval(xi, &coefficients) - yi;
        sum_sq += r * r;
        min_abs = min_abs.min(r.abs());
        max_abs = max_abs.max(r.abs());
    }

    Ok(FitRecord {
        target_index: target,
        target_label: dataset.label(target).to_string(),
        coefficients,
        domain: (lo, hi),
        rms: (sum_sq / x.len() as f64).sqrt(),
        min_abs_residual: min_abs,
        max_abs_residual: max_abs,
    })
}
