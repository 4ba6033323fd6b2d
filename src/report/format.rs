//! Reporting utilities: fit diagnostics and the run summary.
//!
//! Formatting lives in one place so the fitting code stays clean and
//! output changes are localized.

use crate::domain::{ModelDataset, RunConfig, YAxis};
use crate::fit::FitRecord;

/// Per-target fit diagnostic.
///
/// This is the only built-in fit-quality signal; nothing rejects a poor
/// fit automatically, the numbers are surfaced for the caller to judge.
pub fn format_fit_diagnostic(record: &FitRecord) -> String {
    format!(
        "Transformation RMS value for filter\n {}: {:.4}\nRange: {:.4} to {:.4}\n",
        record.target_label, record.rms, record.min_abs_residual, record.max_abs_residual
    )
}

/// Format the full run summary (configuration + per-target fit quality).
///
/// This backs the `fit` subcommand, which never reads the observation
/// table, so the summary is built from the configuration and the fitted
/// records alone.
pub fn format_run_summary(config: &RunConfig, records: &[FitRecord]) -> String {
    let axis = match config.y_axis {
        YAxis::Mag1 => 1,
        YAxis::Mag2 => 2,
    };

    let mut out = String::new();
    out.push_str("=== jwstmag - JWST magnitude prediction ===\n");
    out.push_str(&format!("Model set: {}\n", config.family.config_name()));
    out.push_str(&format!(
        "Source: {} / {}\n",
        config.filter1, config.filter2
    ));
    out.push_str(&format!(
        "Fit: axis={axis} | order={}\n",
        config.fit_order
    ));

    out.push_str("\nFitted targets:\n");
    for rec in records {
        out.push_str(&format!(
            "- {}: rms={:.4} | residuals=[{:.4}, {:.4}] | domain=[{:.4}, {:.4}]\n",
            rec.target_label.trim_end(),
            rec.rms,
            rec.min_abs_residual,
            rec.max_abs_residual,
            rec.domain.0,
            rec.domain.1
        ));
    }
    out
}

/// Format a family's filter catalog listing.
///
/// One line per entry: catalog index, label, effective wavelength, and
/// whether the entry sits in the leading JWST target block. An optional
/// substring narrows the listing the same way filter matching does
/// (case-sensitive containment).
pub fn format_filter_catalog(dataset: &ModelDataset, contains: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} filter catalog: {} filters, {} synthetic stars\n",
        dataset.family().config_name(),
        dataset.filter_count(),
        dataset.star_count()
    ));

    let block = dataset.jwst_block();
    let mut shown = 0usize;
    for (i, entry) in dataset.filters().iter().enumerate() {
        if let Some(text) = contains {
            if !entry.label.contains(text) {
                continue;
            }
        }
        let role = if i < block { "JWST" } else { "source" };
        out.push_str(&format!(
            "{i:>4}  {:<28} {:>8.3} um  {role}\n",
            entry.label.trim_end(),
            entry.parameters.wavelength_um
        ));
        shown += 1;
    }
    if shown == 0 {
        out.push_str("(no catalog entries match)\n");
    }
    out
}
