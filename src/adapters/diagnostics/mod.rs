//! Diagnostics adapter. Implements DiagnosticSink on top of `tracing`.
//!
//! Failures that never reach the channel (tracker requests, transcript writes)
//! end up in the process log instead.

use crate::domain::{DomainError, LogLine, ParsedCommand};
use crate::ports::DiagnosticSink;
use tracing::warn;

/// Emits a `warn!` event per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn tracker_failed(&self, command: &ParsedCommand, error: &DomainError) {
        warn!(command = ?command, error = %error, "issue tracker request failed; command dropped");
    }

    fn chat_log_failed(&self, line: &LogLine, error: &DomainError) {
        warn!(line = %line, error = %error, "failed to append transcript line");
    }
}
