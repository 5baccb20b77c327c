//! Persistence adapters. Channel transcripts on the local filesystem.

pub mod chat_log;

pub use chat_log::FileChatLog;
