//! Read/write transformation JSON files.
//!
//! Transforms JSON is the portable representation of a fitting run:
//!
//! - run provenance (family, source filters, axis, order, timestamp)
//! - per-target Legendre coefficients and fit-quality numbers
//! - a precomputed curve sampled half a magnitude past the fitted domain
//!   on each side, for quick plotting
//!
//! The schema is defined by `domain::TransformsFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{ModelFamily, TransformCurve, TransformRecord, TransformsFile, YAxis};
use crate::error::AppError;
use crate::fit::FitRecord;
use crate::math::legval;

/// Points in the sampled curve.
const CURVE_POINTS: usize = 1000;
/// Margin past the fitted domain on each side, in magnitudes.
const CURVE_MARGIN: f64 = 0.5;

/// Write a transforms JSON file.
pub fn write_transforms_json(
    path: &Path,
    family: ModelFamily,
    source1: &str,
    source2: &str,
    y_axis: YAxis,
    order: usize,
    records: &[FitRecord],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::data(format!(
            "Failed to create transforms JSON '{}': {e}",
            path.display()
        ))
    })?;

    let out = TransformsFile {
        tool: "jwstmag".to_string(),
        created: Utc::now(),
        family,
        source1: source1.to_string(),
        source2: source2.to_string(),
        y_axis,
        order,
        records: records.iter().map(portable).collect(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::data(format!("Failed to write transforms JSON: {e}")))?;
    Ok(())
}

/// Read a transforms JSON file.
pub fn read_transforms_json(path: &Path) -> Result<TransformsFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data(format!(
            "Failed to open transforms JSON '{}': {e}",
            path.display()
        ))
    })?;
    let parsed: TransformsFile = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid transforms JSON: {e}")))?;
    Ok(parsed)
}

fn portable(record: &FitRecord) -> TransformRecord {
    TransformRecord {
        target: record.target_label.clone(),
        index: record.target_index,
        coefficients: record.coefficients.clone(),
        domain: [record.domain.0, record.domain.1],
        rms: record.rms,
        min_abs_residual: record.min_abs_residual,
        max_abs_residual: record.max_abs_residual,
        curve: build_curve(record),
    }
}

/// Sample the raw polynomial over the extended domain.
///
/// The margin region is deliberately unclamped so a plot shows what the
/// polynomial does just past the grid's colour range.
fn build_curve(record: &FitRecord) -> TransformCurve {
    let lo = record.domain.0 - CURVE_MARGIN;
    let hi = record.domain.1 + CURVE_MARGIN;
    let step = (hi - lo) / CURVE_POINTS as f64;

    let mut x = Vec::with_capacity(CURVE_POINTS);
    let mut y = Vec::with_capacity(CURVE_POINTS);
    for i in 0..CURVE_POINTS {
        let xi = lo + step * i as f64;
        x.push(xi);
        y.push(legval(xi, &record.coefficients));
    }
    TransformCurve { x, y }
}
