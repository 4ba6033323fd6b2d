//! Applying fitted transformations to observed photometry.
//!
//! Every fit models `mag_a - target` as a function of the observed colour,
//! where `mag_a` is the source magnitude picked by the fit axis. Prediction
//! inverts that algebra exactly:
//!
//! `predicted = mag_a_obs - P_clamped(x_obs)`
//!
//! When the composition put the other magnitude on the y axis, `mag_a` is
//! reconstructed from the colour first (m2 = y - x, m1 = y + x).

use crate::domain::YAxis;
use crate::fit::compose::ComposedData;
use crate::fit::engine::FitRecord;

/// Which target filters a run predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRequest {
    /// Every filter in the JWST block.
    All,
    One(usize),
    Two(usize, usize),
}

impl TargetRequest {
    /// Concrete catalog indices, ascending, duplicates collapsed.
    ///
    /// Output columns are ordered by catalog index, not by the order the
    /// targets were named in.
    pub fn indices(self, block: usize) -> Vec<usize> {
        match self {
            TargetRequest::All => (0..block).collect(),
            TargetRequest::One(i) => vec![i],
            TargetRequest::Two(i, j) if i == j => vec![i],
            TargetRequest::Two(i, j) => {
                if i < j {
                    vec![i, j]
                } else {
                    vec![j, i]
                }
            }
        }
    }
}

/// Predicted magnitudes for one target filter.
#[derive(Debug, Clone)]
pub struct PredictedColumn {
    pub label: String,
    pub values: Vec<f64>,
}

/// The full prediction result, aligned row for row with the observations.
#[derive(Debug, Clone)]
pub struct PredictedTable {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    pub columns: Vec<PredictedColumn>,
    pub positions: Option<Vec<(String, String)>>,
}

/// Apply fitted transformations to the composed observations.
///
/// `fit_axis` is the axis the fits were built with; it may differ from the
/// axis the composition anchored y to. RA/Dec positions are carried through
/// only when their row count matches the photometry.
pub fn apply_transforms(
    records: &[FitRecord],
    composed: &ComposedData,
    fit_axis: YAxis,
    positions: Option<Vec<(String, String)>>,
) -> PredictedTable {
    let mag_a: Vec<f64> = if fit_axis == composed.y_axis {
        composed.y.clone()
    } else {
        match fit_axis {
            YAxis::Mag1 => composed
                .y
                .iter()
                .zip(&composed.x)
                .map(|(y, x)| y + x)
                .collect(),
            YAxis::Mag2 => composed
                .y
                .iter()
                .zip(&composed.x)
                .map(|(y, x)| y - x)
                .collect(),
        }
    };

    let columns = records
        .iter()
        .map(|rec| PredictedColumn {
            label: rec.target_label.clone(),
            values: mag_a
                .iter()
                .zip(&composed.x)
                .map(|(m, &x)| m - rec.evaluate(x))
                .collect(),
        })
        .collect();

    let positions = positions.and_then(|pos| {
        if pos.len() == composed.x.len() {
            Some(pos)
        } else {
            log::warn!(
                "RA/Dec row count ({}) does not match the photometry ({}); positions dropped",
                pos.len(),
                composed.x.len()
            );
            None
        }
    });

    PredictedTable {
        x: composed.x.clone(),
        y: composed.y.clone(),
        x_label: composed.x_label.clone(),
        y_label: composed.y_label.clone(),
        columns,
        positions,
    }
}
