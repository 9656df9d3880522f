//! Domain models for the clinical calculators.

mod score;

pub use score::*;
