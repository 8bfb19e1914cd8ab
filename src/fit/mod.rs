//! Model fitting.
//!
//! Responsibilities:
//!
//! - score candidate lines by RMS residual (`fitter`)
//! - closed-form ordinary least squares (`fitter`)
//! - rank a parameter grid or random samples (parallel) (`search`)
//! - iterative minimisation through an injected `Minimizer` (`minimize`),
//!   with Nelder-Mead and Newton-Raphson implementations

pub mod fitter;
pub mod minimize;
pub mod nelder_mead;
pub mod newton;
pub mod search;

pub use fitter::*;
pub use minimize::*;
pub use nelder_mead::*;
pub use newton::*;
pub use search::*;
