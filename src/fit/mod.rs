//! Colour transformation fitting.
//!
//! Responsibilities:
//!
//! - compose the observed columns into a (colour, magnitude) working pair
//! - fit Legendre colour-colour relations on the model grid
//! - apply the clamped fits to observed photometry

pub mod apply;
pub mod compose;
pub mod engine;

pub use apply::*;
pub use compose::*;
pub use engine::*;
