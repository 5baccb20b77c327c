//! Implements ChatTransport over a plain IRC connection.
//!
//! Registration (NICK/USER, automatic nick change on 433, wait for 001),
//! keepalive (PING/PONG) and CTCP replies are handled here; the connection
//! manager only sees channel-level events.

use crate::adapters::irc::mapper::{self, CTCP_DELIM};
use crate::adapters::irc::message::IrcMessage;
use crate::domain::{ChatEvent, DomainError, Identity};
use crate::ports::ChatTransport;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

pub const DEFAULT_PORT: u16 = 6667;

/// How long the server may take to accept our registration.
pub const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest line kept, in bytes: 8191 for message tags plus the classic 512.
/// Anything past it is dropped up to the next `\n`.
pub const MAX_LINE: usize = 8191 + 512;

type LineReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type LineWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct Session {
    reader: LineReader,
    writer: LineWriter,
}

/// IRC transport. One session at a time; `connect` replaces any previous one.
pub struct IrcTransport {
    session: Option<Session>,
    identity: Option<Identity>,
    nick: String,
    registration_timeout: Duration,
}

impl Default for IrcTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl IrcTransport {
    pub fn new() -> Self {
        Self {
            session: None,
            identity: None,
            nick: String::new(),
            registration_timeout: REGISTRATION_TIMEOUT,
        }
    }

    pub fn with_registration_timeout(mut self, timeout: Duration) -> Self {
        self.registration_timeout = timeout;
        self
    }

    /// Split `host[:port]`; the port defaults to 6667. IPv6 literals are
    /// accepted bare (`::1`, default port) or bracketed (`[::1]:6697`).
    pub fn parse_server(server: &str) -> Result<(String, u16), DomainError> {
        let server = server.trim();
        let invalid = || DomainError::Transport(format!("invalid server address '{}'", server));
        let parse_port = |port: &str| port.parse::<u16>().map_err(|_| invalid());

        if server.is_empty() {
            return Err(DomainError::Transport("empty server address".into()));
        }

        if let Some(bracketed) = server.strip_prefix('[') {
            let (host, after) = bracketed.split_once(']').ok_or_else(invalid)?;
            if host.is_empty() {
                return Err(invalid());
            }
            let port = match after {
                "" => DEFAULT_PORT,
                _ => parse_port(after.strip_prefix(':').ok_or_else(invalid)?)?,
            };
            return Ok((host.to_string(), port));
        }

        match server.rsplit_once(':') {
            None => Ok((server.to_string(), DEFAULT_PORT)),
            // More than one colon without brackets: a bare IPv6 address.
            Some((host, _)) if host.contains(':') => Ok((server.to_string(), DEFAULT_PORT)),
            Some(("", _)) => Err(invalid()),
            Some((host, port)) => Ok((host.to_string(), parse_port(port)?)),
        }
    }

    /// Register `identity` over an already open byte stream.
    pub async fn connect_stream<S>(&mut self, stream: S, identity: &Identity) -> Result<(), DomainError>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(read_half);
        self.session = Some(Session {
            reader: BufReader::new(reader),
            writer: Box::new(write_half),
        });
        self.identity = Some(identity.clone());
        self.nick = identity.nick.clone();

        let timeout = self.registration_timeout;
        match tokio::time::timeout(timeout, self.register(identity)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.session = None;
                Err(e)
            }
            Err(_) => {
                self.session = None;
                Err(DomainError::Transport(format!(
                    "registration not accepted within {}s",
                    timeout.as_secs()
                )))
            }
        }
    }

    async fn register(&mut self, identity: &Identity) -> Result<(), DomainError> {
        self.write(&IrcMessage::new("NICK", &[identity.nick.as_str()])).await?;
        self.write(&IrcMessage::new(
            "USER",
            &[identity.login.as_str(), "8", "*", identity.real_name.as_str()],
        ))
        .await?;

        let mut tries = 1u32;
        loop {
            let Some(msg) = self.read_message().await? else {
                return Err(DomainError::Transport(
                    "connection closed during registration".into(),
                ));
            };
            match msg.command.as_str() {
                "PING" => self.pong(&msg).await?,
                // RPL_WELCOME carries the nick the server settled on.
                "001" => {
                    if let Some(nick) = msg.param(0) {
                        self.nick = nick.to_string();
                    }
                    info!(nick = %self.nick, "registered with server");
                    return Ok(());
                }
                // ERR_NICKNAMEINUSE
                "433" => {
                    self.nick = format!("{}{}", identity.nick, tries);
                    tries = tries.saturating_add(1);
                    warn!(nick = %self.nick, "nick in use, retrying");
                    let nick = self.nick.clone();
                    self.write(&IrcMessage::new("NICK", &[nick.as_str()])).await?;
                }
                "ERROR" => {
                    return Err(DomainError::Transport(format!(
                        "server refused registration: {}",
                        msg.trailing().unwrap_or_default()
                    )));
                }
                _ => {}
            }
        }
    }

    /// Next parsed line; `Ok(None)` on EOF. Lines longer than `MAX_LINE`
    /// are cut and the remainder skipped.
    async fn read_message(&mut self) -> Result<Option<IrcMessage>, DomainError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| DomainError::Transport("not connected".into()))?;
        let read_err = |e: std::io::Error| DomainError::Transport(format!("read: {}", e));
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = (&mut session.reader)
                .take(MAX_LINE as u64)
                .read_until(b'\n', &mut buf)
                .await
                .map_err(read_err)?;
            if n == 0 {
                return Ok(None);
            }
            if n == MAX_LINE && buf.last() != Some(&b'\n') {
                let skipped = skip_line(&mut session.reader).await.map_err(read_err)?;
                warn!(kept = n, skipped, "oversized line truncated");
            }
            let line = String::from_utf8_lossy(&buf);
            if let Some(msg) = IrcMessage::parse(&line) {
                return Ok(Some(msg));
            }
        }
    }

    async fn write(&mut self, msg: &IrcMessage) -> Result<(), DomainError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| DomainError::Transport("not connected".into()))?;
        let line = format!("{}\r\n", msg);
        session
            .writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| DomainError::Transport(format!("write: {}", e)))?;
        session
            .writer
            .flush()
            .await
            .map_err(|e| DomainError::Transport(format!("flush: {}", e)))
    }

    async fn pong(&mut self, ping: &IrcMessage) -> Result<(), DomainError> {
        let token = ping.trailing().unwrap_or_default().to_string();
        self.write(&IrcMessage::new("PONG", &[token.as_str()])).await
    }

    /// Answer `VERSION`, `FINGER`, `PING` and `TIME` queries with a NOTICE.
    async fn reply_ctcp(&mut self, from: &str, payload: &str) -> Result<(), DomainError> {
        let body = payload.trim_matches(CTCP_DELIM);
        let (query, arg) = body.split_once(' ').unwrap_or((body, ""));
        let identity = self.identity.clone();
        let answer = match query.to_ascii_uppercase().as_str() {
            "VERSION" => identity.map(|i| format!("VERSION {}", i.version)),
            "FINGER" => identity.map(|i| format!("FINGER {}", i.finger)),
            "PING" => Some(format!("PING {}", arg)),
            "TIME" => Some(format!("TIME {}", chrono::Local::now().to_rfc2822())),
            _ => None,
        };
        match answer {
            Some(answer) => {
                debug!(from, query, "answering CTCP query");
                let text = format!("{}{}{}", CTCP_DELIM, answer.trim_end(), CTCP_DELIM);
                self.write(&IrcMessage::new("NOTICE", &[from, text.as_str()])).await
            }
            None => Ok(()),
        }
    }

    fn drop_session(&mut self, reason: &str) -> ChatEvent {
        if self.session.take().is_some() {
            info!(reason, "chat session closed");
        }
        ChatEvent::Disconnected
    }
}

/// Discard input up to and including the next `\n` (or EOF). Returns the
/// number of bytes dropped.
async fn skip_line(reader: &mut LineReader) -> std::io::Result<usize> {
    let mut skipped = 0;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(skipped);
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(idx) => {
                reader.consume(idx + 1);
                return Ok(skipped + idx + 1);
            }
            None => {
                let len = available.len();
                reader.consume(len);
                skipped += len;
            }
        }
    }
}

#[async_trait]
impl ChatTransport for IrcTransport {
    async fn connect(&mut self, server: &str, identity: &Identity) -> Result<(), DomainError> {
        self.session = None;
        let (host, port) = Self::parse_server(server)?;
        info!(host = %host, port, nick = %identity.nick, "connecting");
        let stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| DomainError::Transport(format!("connect {}:{}: {}", host, port, e)))?;
        self.connect_stream(stream, identity).await
    }

    async fn identify(&mut self, secret: &str) -> Result<(), DomainError> {
        let text = format!("identify {}", secret);
        self.write(&IrcMessage::new("PRIVMSG", &["NickServ", text.as_str()]))
            .await
    }

    async fn join(&mut self, channel: &str) -> Result<(), DomainError> {
        self.write(&IrcMessage::new("JOIN", &[channel])).await
    }

    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), DomainError> {
        self.write(&IrcMessage::new("PRIVMSG", &[target, text])).await
    }

    async fn next_event(&mut self) -> Result<ChatEvent, DomainError> {
        if self.session.is_none() {
            return Ok(ChatEvent::Disconnected);
        }
        loop {
            let msg = match self.read_message().await {
                Ok(Some(msg)) => msg,
                Ok(None) => return Ok(self.drop_session("server closed the connection")),
                Err(e) => {
                    warn!(error = %e, "read failed");
                    return Ok(self.drop_session("read failed"));
                }
            };

            let housekeeping = match msg.command.as_str() {
                "PING" => Some(self.pong(&msg).await),
                "PRIVMSG" if msg.param(1).is_some_and(|t| t.starts_with(CTCP_DELIM)) => {
                    let from = msg.prefix.as_ref().map(|p| p.nick.clone());
                    let payload = msg.param(1).unwrap_or_default().to_string();
                    match from {
                        Some(from) => Some(self.reply_ctcp(&from, &payload).await),
                        None => Some(Ok(())),
                    }
                }
                "NICK" => {
                    let ours = msg.prefix.as_ref().is_some_and(|p| p.nick == self.nick);
                    if ours {
                        if let Some(new_nick) = msg.param(0) {
                            info!(old = %self.nick, new = %new_nick, "nick changed");
                            self.nick = new_nick.to_string();
                        }
                    }
                    Some(Ok(()))
                }
                "ERROR" => {
                    warn!(reason = msg.trailing().unwrap_or_default(), "server error");
                    Some(Ok(()))
                }
                _ => None,
            };

            match housekeeping {
                Some(Ok(())) => continue,
                Some(Err(e)) => {
                    warn!(error = %e, "write failed");
                    return Ok(self.drop_session("write failed"));
                }
                None => {}
            }

            match mapper::to_event(&msg) {
                Some(event) => return Ok(event),
                None => debug!(command = %msg.command, "ignoring message"),
            }
        }
    }

    fn current_nick(&self) -> String {
        self.nick.clone()
    }
}
