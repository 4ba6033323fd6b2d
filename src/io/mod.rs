//! Input/output helpers.
//!
//! - model grid loading (`grid`)
//! - observed catalog ingest (`catalog`)
//! - batch configuration parsing (`config`)
//! - result table output (`export`)
//! - transforms JSON read/write (`transforms`)

pub mod catalog;
pub mod config;
pub mod export;
pub mod grid;
pub mod transforms;

pub use catalog::*;
pub use config::*;
pub use export::*;
pub use grid::*;
pub use transforms::*;
