//! Application configuration. Chat identity, channel, tracker project, paths.
//!
//! Read from a `.properties` file (`key=value`), overridable by `BOT_*`
//! environment variables (`BOT_IDENTIFY`, `BOT_GITHUB__TOKEN`, ...).

use crate::domain::DomainError;
use config::{FileStoredFormat, Format, Map, Value};
use std::path::PathBuf;

/// Config file used when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "bot.properties";

/// Log directory used when `logdir` is unset.
pub const DEFAULT_LOG_DIR: &str = "logs/";

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Tracker project the bot answers for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    /// Optional API token; raises the anonymous rate limit.
    pub token: Option<String>,
    pub api_base: String,
}

/// Immutable bot configuration. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub name: String,
    /// `host[:port]`
    pub server: String,
    pub channel: String,
    /// NickServ secret, sent after connecting and before joining.
    pub identify: Option<String>,
    pub log_dir: PathBuf,
    pub github: GithubConfig,
    /// When set, `#open` results are sliced to `[start, start + page_size)`.
    /// Unset keeps the page start index inert.
    pub open_page_size: Option<usize>,
}

impl BotConfig {
    /// Load from a properties file plus `BOT_*` env overrides, validate, and
    /// create the log directory. `.env` is expected to be loaded by the caller.
    pub fn load(path: &str) -> Result<Self, DomainError> {
        let settings = config::Config::builder()
            .add_source(config::File::new(path, PropertiesFormat))
            .add_source(
                config::Environment::with_prefix("BOT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| DomainError::Config(format!("read {}: {}", path, e)))?;
        let cfg = Self::from_settings(&settings)?;
        std::fs::create_dir_all(&cfg.log_dir).map_err(|e| {
            DomainError::Config(format!(
                "create log directory {}: {}",
                cfg.log_dir.display(),
                e
            ))
        })?;
        Ok(cfg)
    }

    /// Extract and validate fields. Every missing required key is reported at once.
    pub fn from_settings(settings: &config::Config) -> Result<Self, DomainError> {
        let get = |key: &str| -> Option<String> {
            settings
                .get_string(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let name = get("name");
        let server = get("server");
        let channel = get("channel");
        let owner = get("github.user");
        let repo = get("github.repo");

        let missing: Vec<&str> = [
            ("name", &name),
            ("server", &server),
            ("channel", &channel),
            ("github.user", &owner),
            ("github.repo", &repo),
        ]
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();
        if !missing.is_empty() {
            return Err(DomainError::Config(format!(
                "properties {} must be set",
                missing.join(", ")
            )));
        }

        let open_page_size = match get("open.pagesize") {
            None => None,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(DomainError::Config(format!(
                        "open.pagesize must be a positive integer, got '{}'",
                        raw
                    )));
                }
            },
        };

        Ok(Self {
            name: name.unwrap_or_default(),
            server: server.unwrap_or_default(),
            channel: channel.unwrap_or_default(),
            identify: get("identify"),
            log_dir: PathBuf::from(get("logdir").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
            github: GithubConfig {
                owner: owner.unwrap_or_default(),
                repo: repo.unwrap_or_default(),
                token: get("github.token"),
                api_base: get("github.api").unwrap_or_else(|| DEFAULT_GITHUB_API.to_string()),
            },
            open_page_size,
        })
    }
}

/// Java-style properties: `key=value` or `key: value`, `#`/`!` comment lines.
///
/// Values are taken verbatim after the separator, so `channel=#syncany` keeps
/// its leading `#`.
#[derive(Debug, Clone, Copy)]
pub struct PropertiesFormat;

impl PropertiesFormat {
    fn parse_line(line: &str) -> Option<(&str, &str)> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            return None;
        }
        let sep = line.find(['=', ':']);
        let (key, value) = match sep {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, ""),
        };
        Some((key.trim(), value.trim()))
    }
}

impl Format for PropertiesFormat {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn std::error::Error + Send + Sync>> {
        let mut map = Map::new();
        for (key, value) in text.lines().filter_map(Self::parse_line) {
            if key.is_empty() {
                continue;
            }
            map.insert(key.to_string(), Value::new(uri, value.to_string()));
        }
        Ok(map)
    }
}

impl FileStoredFormat for PropertiesFormat {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["properties"]
    }
}
