//! Mathematical utilities: least squares, axis spacing and summary statistics.

pub mod ols;
pub mod spacing;
pub mod stats;

pub use ols::*;
pub use spacing::*;
pub use stats::*;
