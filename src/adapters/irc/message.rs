//! IRC line codec. `[@tags] [:prefix] COMMAND [params...] [:trailing]`.

use std::fmt;

/// Message source. For server-originated lines only `nick` (the server name) is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix {
    pub nick: String,
    pub user: String,
    pub host: String,
}

impl Prefix {
    /// Split `nick!user@host`; missing parts stay empty.
    pub fn parse(raw: &str) -> Self {
        let (nick, rest) = match raw.split_once('!') {
            Some((nick, rest)) => (nick, Some(rest)),
            None => (raw, None),
        };
        let (nick, user, host) = match rest {
            Some(rest) => match rest.split_once('@') {
                Some((user, host)) => (nick, user, host),
                None => (nick, rest, ""),
            },
            None => match nick.split_once('@') {
                Some((nick, host)) => (nick, "", host),
                None => (nick, "", ""),
            },
        };
        Self {
            nick: nick.to_string(),
            user: user.to_string(),
            host: host.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    pub prefix: Option<Prefix>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Outbound message without prefix.
    pub fn new(command: &str, params: &[&str]) -> Self {
        Self {
            prefix: None,
            command: command.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Parse one received line. Tolerates a trailing `\r\n`; returns None for
    /// blank lines or lines without a command.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        if let Some(tagged) = rest.strip_prefix('@') {
            rest = tagged.split_once(' ').map_or("", |(_, r)| r);
        }
        rest = rest.trim_start_matches(' ');

        let prefix = match rest.strip_prefix(':') {
            Some(with_prefix) => {
                let (raw, r) = with_prefix.split_once(' ')?;
                rest = r;
                Some(Prefix::parse(raw))
            }
            None => None,
        };
        rest = rest.trim_start_matches(' ');

        let (command, mut rest) = match rest.split_once(' ') {
            Some((cmd, r)) => (cmd, r),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match rest.split_once(' ') {
                Some((param, r)) => {
                    params.push(param.to_string());
                    rest = r;
                }
                None => {
                    params.push(rest.to_string());
                    break;
                }
            }
        }

        Some(Self {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    /// Last parameter (the free text of PRIVMSG, QUIT, ...).
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }
}

/// Serializes without the line terminator. CR/LF inside params is replaced by
/// spaces so one message can never turn into two protocol lines.
impl fmt::Display for IrcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.prefix {
            write!(f, ":{}", p.nick)?;
            if !p.user.is_empty() {
                write!(f, "!{}", p.user)?;
            }
            if !p.host.is_empty() {
                write!(f, "@{}", p.host)?;
            }
            f.write_str(" ")?;
        }
        f.write_str(&self.command)?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            let clean = param.replace(['\r', '\n'], " ");
            let needs_colon =
                i == last && (clean.is_empty() || clean.contains(' ') || clean.starts_with(':'));
            if needs_colon {
                write!(f, " :{}", clean)?;
            } else {
                write!(f, " {}", clean)?;
            }
        }
        Ok(())
    }
}
