//! Command-line parsing for the JWST magnitude converter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ModelFamily;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "jwstmag",
    version,
    about = "Predict JWST filter magnitudes from observed colours via model-grid fits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a batch transformation and write the predicted magnitude table.
    Transform(RunArgs),
    /// Fit the transformations and print diagnostics, without writing a table.
    Fit(RunArgs),
    /// List a model family's filter catalog.
    Filters(FiltersArgs),
}

/// Common options for transforming and fitting.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Run configuration file (TOML).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Directory holding the model grid files
    /// (overrides SIMULATED_MAGNITUDES_PATH).
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Fit every filter in the JWST block instead of the configured targets.
    #[arg(long)]
    pub all: bool,

    /// Export the fitted transformations (coefficients + sampled curves) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for listing a filter catalog.
#[derive(Debug, Parser)]
pub struct FiltersArgs {
    /// Model family whose catalog to list.
    #[arg(long, value_enum)]
    pub modelset: ModelFamily,

    /// Directory holding the model grid files
    /// (overrides SIMULATED_MAGNITUDES_PATH).
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Only list labels containing this text (case-sensitive, like filter
    /// matching itself).
    #[arg(long, value_name = "TEXT")]
    pub contains: Option<String>,
}
