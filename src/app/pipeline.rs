//! Shared batch pipeline used by the `transform` and `fit` subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! configuration -> model grid -> filter resolution -> catalog read ->
//! composition -> per-target fits
//!
//! The subcommands then focus on presentation (which tables and exports
//! to write). `fit` stops before the observation table is touched, so a
//! fit-only run works without the data file.

use std::path::Path;

use crate::domain::{ModelDataset, RunConfig, YAxis};
use crate::error::AppError;
use crate::fit::{self, ComposedData, FitRecord, TargetRequest};
use crate::io;

/// All computed outputs of one batch run, up to the fitted transforms.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub composed: ComposedData,
    /// Verbatim RA/Dec strings read alongside the photometry, if configured.
    pub positions: Option<Vec<(String, String)>>,
    /// One fitted transformation per requested target, ascending by
    /// catalog index.
    pub records: Vec<FitRecord>,
}

/// Load the configured family's dataset, resolving the models directory.
pub fn load_dataset(
    config: &RunConfig,
    models_dir: Option<&Path>,
) -> Result<ModelDataset, AppError> {
    let dir = io::grid::resolve_models_dir(models_dir);
    Ok(io::grid::load_model_dataset(config.family, &dir)?)
}

/// Execute the full batch pipeline from configuration to fitted transforms.
pub fn run_batch(
    config: &RunConfig,
    models_dir: Option<&Path>,
    all_targets: bool,
) -> Result<RunOutput, AppError> {
    let dataset = load_dataset(config, models_dir)?;
    run_batch_with_dataset(config, &dataset, all_targets)
}

/// Execute the batch pipeline with a pre-loaded dataset.
///
/// This is useful for callers that already hold the grid in memory: refits
/// against the same family skip the file reload.
pub fn run_batch_with_dataset(
    config: &RunConfig,
    dataset: &ModelDataset,
    all_targets: bool,
) -> Result<RunOutput, AppError> {
    // All four filters must resolve before any other work; one failure
    // aborts the run naming the filter.
    let filters = resolve_filters(config, dataset)?;

    let observations = io::catalog::read_observations(
        &config.datafile,
        config.column1,
        config.column2,
        config.ra_column,
        config.dec_column,
    )?;

    // The batch path anchors y to the first source magnitude; the applier
    // honours the configured fit axis when the fits are inverted.
    let composed = fit::compose_xy(
        config.column1_kind,
        config.column2_kind,
        YAxis::Mag1,
        &config.filter1,
        &config.filter2,
        &observations.mag1,
        &observations.mag2,
    )?;

    let records = fit_requested(config, dataset, &filters, all_targets)?;

    Ok(RunOutput {
        composed,
        positions: observations.positions,
        records,
    })
}

/// Resolve filters and fit the requested targets, without touching the
/// observation table.
pub fn run_fits(
    config: &RunConfig,
    dataset: &ModelDataset,
    all_targets: bool,
) -> Result<Vec<FitRecord>, AppError> {
    let filters = resolve_filters(config, dataset)?;
    fit_requested(config, dataset, &filters, all_targets)
}

/// The four resolved catalog indices of a run.
struct ResolvedFilters {
    source1: usize,
    source2: usize,
    target1: usize,
    target2: usize,
}

fn resolve_filters(
    config: &RunConfig,
    dataset: &ModelDataset,
) -> Result<ResolvedFilters, AppError> {
    Ok(ResolvedFilters {
        source1: resolve_filter(dataset, &config.filter1)?,
        source2: resolve_filter(dataset, &config.filter2)?,
        target1: resolve_filter(dataset, &config.target1)?,
        target2: resolve_filter(dataset, &config.target2)?,
    })
}

fn resolve_filter(dataset: &ModelDataset, name: &str) -> Result<usize, AppError> {
    dataset.match_filter(name).ok_or_else(|| {
        AppError::config(format!(
            "Filter '{name}' does not match any entry in the {} catalog",
            dataset.family().config_name()
        ))
    })
}

fn fit_requested(
    config: &RunConfig,
    dataset: &ModelDataset,
    filters: &ResolvedFilters,
    all_targets: bool,
) -> Result<Vec<FitRecord>, AppError> {
    let request = if all_targets {
        TargetRequest::All
    } else {
        TargetRequest::Two(filters.target1, filters.target2)
    };

    let mut records = Vec::new();
    for target in request.indices(dataset.jwst_block()) {
        let record = fit::fit_target(
            dataset,
            filters.source1,
            filters.source2,
            target,
            config.y_axis,
            config.fit_order,
        )?;
        records.push(record);
    }
    Ok(records)
}
