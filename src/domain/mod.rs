//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod log_line;

pub use entities::{ChatEvent, Identity, Issue, IssueState, ParsedCommand, Sender};
pub use errors::DomainError;
pub use log_line::LogLine;
