//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Connect/identify/join failure or a dropped session. Recovered by reconnecting.
    #[error("Chat transport error: {0}")]
    Transport(String),

    /// Issue tracker request failed. Swallowed at the command boundary.
    #[error("Issue tracker error: {0}")]
    Tracker(String),

    #[error("Chat log error: {0}")]
    ChatLog(String),
}
