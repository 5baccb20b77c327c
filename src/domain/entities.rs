//! Domain entities. Pure data structures for the core business.
//!
//! No IRC/HTTP types here; adapters map into these.

use chrono::{DateTime, Utc};

/// Who sent something on the chat network (`nick!login@host`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub nick: String,
    pub login: String,
    pub host: String,
}

impl Sender {
    pub fn new(nick: impl Into<String>, login: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            login: login.into(),
            host: host.into(),
        }
    }
}

/// Event delivered by the chat transport to the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A message posted to a channel.
    MessageReceived {
        channel: String,
        sender: Sender,
        text: String,
    },
    Joined {
        channel: String,
        sender: Sender,
    },
    Parted {
        channel: String,
        sender: Sender,
    },
    /// A user left the network entirely.
    Quit { sender: Sender, reason: String },
    /// The session is gone (EOF, read error, server closed the link).
    Disconnected,
}

/// Identity attributes applied before connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nick: String,
    pub login: String,
    pub real_name: String,
    /// Reply to CTCP VERSION.
    pub version: String,
    /// Reply to CTCP FINGER.
    pub finger: String,
}

impl Identity {
    /// Uses the bot name for every attribute.
    pub fn from_name(name: &str) -> Self {
        Self {
            nick: name.to_string(),
            login: name.to_string(),
            real_name: name.to_string(),
            version: name.to_string(),
            finger: name.to_string(),
        }
    }
}

/// Command recognized in a channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `#64` -> print details of issue 64.
    ShowIssue(u64),
    /// `#open [page] [keywords...]` -> list matching open issues.
    ListOpenIssues { start: usize, keywords: Vec<String> },
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracker issue. Owned by the tracker adapter; the core only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    /// Display name, falling back to the login when the tracker has none.
    pub author: String,
    pub comments: u64,
    pub labels: Vec<String>,
    pub url: String,
}
