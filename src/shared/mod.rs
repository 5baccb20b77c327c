//! Cross-cutting settings.

pub mod config;
