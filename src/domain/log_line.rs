//! Transcript records. Every free-text field is capped before formatting so a
//! hostile or malformed network value cannot blow up a log line.

use std::fmt;

use crate::domain::Sender;

pub const MAX_SENDER: usize = 50;
pub const MAX_LOGIN: usize = 25;
pub const MAX_HOST: usize = 150;
pub const MAX_CHANNEL: usize = 20;
pub const MAX_REASON: usize = 200;
pub const MAX_MESSAGE: usize = 1024;

/// One line of the channel transcript (without the `[HH:mm]` stamp, which the
/// chat log adds at write time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// `<sender> text`
    Message { sender: String, text: String },
    /// `nick (login@host) joined #channel.`
    Joined { sender: Sender, channel: String },
    /// `nick (login@host) left #channel.`
    Parted { sender: Sender, channel: String },
    /// `nick (login@host) left irc: reason.`
    Quit { sender: Sender, reason: String },
}

impl LogLine {
    pub fn message(sender: impl Into<String>, text: impl Into<String>) -> Self {
        LogLine::Message {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Returns at most `max` characters of `s`. Counts chars, not bytes.
pub fn shorten(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn who(sender: &Sender) -> String {
    format!(
        "{} ({}@{})",
        shorten(&sender.nick, MAX_SENDER),
        shorten(&sender.login, MAX_LOGIN),
        shorten(&sender.host, MAX_HOST)
    )
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLine::Message { sender, text } => write!(
                f,
                "<{}> {}",
                shorten(sender, MAX_SENDER),
                shorten(text, MAX_MESSAGE)
            ),
            LogLine::Joined { sender, channel } => write!(
                f,
                "{} joined {}.",
                who(sender),
                shorten(channel, MAX_CHANNEL)
            ),
            LogLine::Parted { sender, channel } => {
                write!(f, "{} left {}.", who(sender), shorten(channel, MAX_CHANNEL))
            }
            LogLine::Quit { sender, reason } => write!(
                f,
                "{} left irc: {}.",
                who(sender),
                shorten(reason, MAX_REASON)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_is_char_based() {
        assert_eq!(shorten("abc", 5), "abc");
        assert_eq!(shorten("abcdef", 3), "abc");
        assert_eq!(shorten("ääää", 2), "ää");
        assert_eq!(shorten("", 2), "");
    }

    #[test]
    fn test_message_sender_capped_at_50() {
        let long = "n".repeat(80);
        let line = LogLine::message(long.clone(), "hi").to_string();
        assert_eq!(line, format!("<{}> hi", "n".repeat(50)));
        assert!(!line.contains(&long));
    }

    #[test]
    fn test_message_text_capped_at_1024() {
        let line = LogLine::message("bob", "x".repeat(2000)).to_string();
        assert_eq!(line.len(), "<bob> ".len() + 1024);
    }

    #[test]
    fn test_lifecycle_formats() {
        let sender = Sender::new("alice", "al", "example.org");
        assert_eq!(
            LogLine::Joined {
                sender: sender.clone(),
                channel: "#syncany".into()
            }
            .to_string(),
            "alice (al@example.org) joined #syncany."
        );
        assert_eq!(
            LogLine::Parted {
                sender: sender.clone(),
                channel: "#syncany".into()
            }
            .to_string(),
            "alice (al@example.org) left #syncany."
        );
        assert_eq!(
            LogLine::Quit {
                sender,
                reason: "Ping timeout".into()
            }
            .to_string(),
            "alice (al@example.org) left irc: Ping timeout."
        );
    }

    #[test]
    fn test_lifecycle_fields_capped() {
        let sender = Sender::new("n".repeat(60), "l".repeat(30), "h".repeat(200));
        let line = LogLine::Joined {
            sender,
            channel: format!("#{}", "c".repeat(40)),
        }
        .to_string();
        let expected = format!(
            "{} ({}@{}) joined #{}.",
            "n".repeat(50),
            "l".repeat(25),
            "h".repeat(150),
            "c".repeat(19)
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn test_quit_reason_capped_at_200() {
        let line = LogLine::Quit {
            sender: Sender::new("a", "b", "c"),
            reason: "r".repeat(300),
        }
        .to_string();
        assert_eq!(line, format!("a (b@c) left irc: {}.", "r".repeat(200)));
    }
}
