//! Map IRC messages to domain chat events.

use crate::adapters::irc::message::{IrcMessage, Prefix};
use crate::domain::{ChatEvent, Sender};

/// CTCP payloads are wrapped in `\x01`.
pub const CTCP_DELIM: char = '\u{1}';

pub fn sender_from_prefix(prefix: Option<&Prefix>) -> Sender {
    prefix
        .map(|p| Sender::new(p.nick.clone(), p.user.clone(), p.host.clone()))
        .unwrap_or_default()
}

pub fn is_channel(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

/// Channel traffic and membership changes become events; everything else
/// (numerics, private messages, CTCP) is left to the transport.
pub fn to_event(msg: &IrcMessage) -> Option<ChatEvent> {
    let sender = || sender_from_prefix(msg.prefix.as_ref());
    match msg.command.as_str() {
        "PRIVMSG" => {
            let target = msg.param(0)?;
            let text = msg.param(1)?;
            if !is_channel(target) || text.starts_with(CTCP_DELIM) {
                return None;
            }
            Some(ChatEvent::MessageReceived {
                channel: target.to_string(),
                sender: sender(),
                text: text.to_string(),
            })
        }
        "JOIN" => Some(ChatEvent::Joined {
            channel: msg.param(0)?.to_string(),
            sender: sender(),
        }),
        "PART" => Some(ChatEvent::Parted {
            channel: msg.param(0)?.to_string(),
            sender: sender(),
        }),
        "QUIT" => Some(ChatEvent::Quit {
            sender: sender(),
            reason: msg.trailing().unwrap_or_default().to_string(),
        }),
        _ => None,
    }
}
