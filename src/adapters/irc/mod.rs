//! IRC chat adapter. Implements ChatTransport on a plain TCP connection.

pub mod client;
pub mod mapper;
pub mod message;

pub use client::IrcTransport;
