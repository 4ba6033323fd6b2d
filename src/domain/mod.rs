//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the model-family enum (`ModelFamily`) and its per-family constants
//! - the immutable synthetic-photometry dataset (`ModelDataset`) with its
//!   substring filter lookup
//! - input configuration enums (`ColumnKind`, `YAxis`)
//! - the validated batch configuration (`RunConfig`)

pub mod types;

pub use types::*;
