//! Infrastructure adapters. Implement outbound ports.
//!
//! IRC, GitHub, filesystem transcripts, diagnostics. Map errors to DomainError.

pub mod diagnostics;
pub mod github;
pub mod irc;
pub mod persistence;
