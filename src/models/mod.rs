//! Linear model family.
//!
//! Implemented as small, pure functions so that fitting/search code can stay
//! generic over the parameter vector.

pub mod model;

pub use model::*;
