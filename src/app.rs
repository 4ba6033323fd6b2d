//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the batch pipeline (configuration -> model grid -> fits)
//! - prints fit diagnostics
//! - writes the predicted magnitude table and optional exports

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, FiltersArgs, RunArgs};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::fit::FitRecord;

pub mod pipeline;

/// Entry point for the `jwstmag` binary.
pub fn run() -> Result<(), AppError> {
    // The historical interface is `jwstmag <config>` with no subcommand.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the one-argument batch invocation.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Transform(args) => handle_transform(args),
        Command::Fit(args) => handle_fit(args),
        Command::Filters(args) => handle_filters(args),
    }
}

/// The full batch run: fit the requested transformations, apply them to
/// the observation table and write the predicted magnitudes.
fn handle_transform(args: RunArgs) -> Result<(), AppError> {
    let config = crate::io::config::load_run_config(&args.config)?;
    let run = pipeline::run_batch(&config, args.models_dir.as_deref(), args.all)?;

    for record in &run.records {
        println!("{}", crate::report::format_fit_diagnostic(record));
    }

    let table = crate::fit::apply_transforms(
        &run.records,
        &run.composed,
        config.y_axis,
        run.positions,
    );
    crate::io::export::write_predicted_table(&config.out_path, &table)?;
    println!("Output file {} has been written.", config.out_path.display());

    maybe_export(args.export.as_deref(), &config, &run.records)
}

/// Fit only: the observation table is never read, so the configured data
/// file does not need to exist.
fn handle_fit(args: RunArgs) -> Result<(), AppError> {
    let config = crate::io::config::load_run_config(&args.config)?;
    let dataset = pipeline::load_dataset(&config, args.models_dir.as_deref())?;
    let records = pipeline::run_fits(&config, &dataset, args.all)?;

    println!("{}", crate::report::format_run_summary(&config, &records));

    maybe_export(args.export.as_deref(), &config, &records)
}

fn maybe_export(
    path: Option<&Path>,
    config: &RunConfig,
    records: &[FitRecord],
) -> Result<(), AppError> {
    if let Some(path) = path {
        crate::io::transforms::write_transforms_json(
            path,
            config.family,
            &config.filter1,
            &config.filter2,
            config.y_axis,
            config.fit_order,
            records,
        )?;
        println!("Transforms written to {}.", path.display());
    }
    Ok(())
}

fn handle_filters(args: FiltersArgs) -> Result<(), AppError> {
    let models_dir = crate::io::grid::resolve_models_dir(args.models_dir.as_deref());
    let dataset = crate::io::grid::load_model_dataset(args.modelset, &models_dir)?;
    println!(
        "{}",
        crate::report::format_filter_catalog(&dataset, args.contains.as_deref())
    );
    Ok(())
}

/// Rewrite argv so `jwstmag run.cfg` behaves like `jwstmag transform run.cfg`.
///
/// Rules:
/// - `jwstmag`                      -> unchanged (top-level help)
/// - `jwstmag run.cfg`              -> `jwstmag transform run.cfg`
/// - `jwstmag --models-dir D cfg`   -> `jwstmag transform --models-dir D cfg`
/// - `jwstmag --help/--version/-h`  -> unchanged
/// - explicit subcommands           -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "transform" | "fit" | "filters");
    if is_subcommand {
        return argv;
    }

    // Anything else is a configuration path, possibly preceded by flags.
    argv.insert(1, "transform".to_string());
    argv
}
