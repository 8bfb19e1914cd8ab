//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - JSON report and CSV exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
