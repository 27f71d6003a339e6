//! Application layer: the deliverer contract and its render variants.

pub mod code;
pub mod deliver;
pub mod quote;
