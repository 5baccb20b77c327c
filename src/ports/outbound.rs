//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ChatEvent, DomainError, Identity, LogLine, ParsedCommand};

/// Chat network session. Connect, optionally authenticate, join one channel,
/// exchange messages.
///
/// Owned exclusively by the connection manager, so methods take `&mut self`.
#[async_trait::async_trait]
pub trait ChatTransport: Send {
    /// Open a session to `server` (`host[:port]`) and register `identity`.
    /// Returns once the server has accepted the registration.
    async fn connect(&mut self, server: &str, identity: &Identity) -> Result<(), DomainError>;

    /// Send the identify secret to the network's nickname service.
    async fn identify(&mut self, secret: &str) -> Result<(), DomainError>;

    async fn join(&mut self, channel: &str) -> Result<(), DomainError>;

    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), DomainError>;

    /// Wait for the next event. Protocol housekeeping (keepalives, CTCP) is
    /// handled inside the adapter. A lost session yields `ChatEvent::Disconnected`.
    async fn next_event(&mut self) -> Result<ChatEvent, DomainError>;

    /// Nick currently in use; may differ from the configured one after an
    /// automatic nick change.
    fn current_nick(&self) -> String;
}

/// Append-only channel transcript.
#[async_trait::async_trait]
pub trait ChatLogPort: Send + Sync {
    async fn append(&self, line: &LogLine) -> Result<(), DomainError>;
}

/// Process diagnostics for failures that are invisible to the channel.
pub trait DiagnosticSink: Send + Sync {
    /// A tracker request behind `command` failed; the command produced no reply.
    fn tracker_failed(&self, command: &ParsedCommand, error: &DomainError);

    /// A transcript line could not be written.
    fn chat_log_failed(&self, line: &LogLine, error: &DomainError);
}
