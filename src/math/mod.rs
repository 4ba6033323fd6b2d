//! Mathematical utilities: Legendre series evaluation and fitting.

pub mod legendre;

pub use legendre::*;
