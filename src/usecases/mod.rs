//! Application use cases. Orchestrate domain logic via ports.

pub mod command_parser;
pub mod connection_manager;
pub mod issue_presenter;

pub use connection_manager::{ConnectionManager, ConnectionState, RECONNECT_DELAY};
