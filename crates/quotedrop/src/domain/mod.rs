//! Pure domain types shared across the delivery pipeline.

pub mod errors;
pub mod model;
