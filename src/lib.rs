//! irc-issue-bot: IRC channel logger and issue-tracker responder with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
