//! Infrastructure adapters for clipboard, filesystem, and configuration.

pub mod clipboard;
pub mod config;
pub mod targets;
