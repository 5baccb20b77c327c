//! Recognize chat commands in channel messages.
//!
//! - `#<digits>` (whole message, up to 10 digits) -> show one issue
//! - `#open<rest>` -> list open issues; word runs in `<rest>` are label keywords,
//!   the first run of digits (at most 3 taken) is the page start index

use crate::domain::ParsedCommand;
use regex::Regex;
use std::sync::LazyLock;

static SHOW_ISSUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d{1,10})$").expect("valid show-issue regex"));

static OPEN_ISSUES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#open(.*)$").expect("valid open-issues regex"));

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

static START_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,3}").expect("valid start-index regex"));

/// Parse a channel message. Pure; no side effects.
pub fn parse(message: &str) -> ParsedCommand {
    if let Some(caps) = SHOW_ISSUE.captures(message) {
        // Ten digits always fit in u64.
        if let Ok(number) = caps[1].parse::<u64>() {
            return ParsedCommand::ShowIssue(number);
        }
    }

    if let Some(caps) = OPEN_ISSUES.captures(message) {
        let rest = caps.get(1).map_or("", |m| m.as_str());
        let keywords: Vec<String> = WORD
            .find_iter(rest)
            .map(|m| m.as_str().to_string())
            .collect();
        let start = start_index(rest);
        return ParsedCommand::ListOpenIssues { start, keywords };
    }

    ParsedCommand::None
}

/// First digit run in `rest`, cut to 3 digits; 0 when there is none.
fn start_index(rest: &str) -> usize {
    START_INDEX
        .find(rest)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
