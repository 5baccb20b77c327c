//! Bot core: owns the chat session lifecycle and dispatches channel events.
//!
//! `Disconnected -> Connecting -> Identifying -> Joining -> Joined`, and back to
//! `Disconnected` on any failure or drop, followed by a fixed-delay reconnect.
//! Events are handled one at a time, to completion, in arrival order.

use crate::domain::{ChatEvent, DomainError, Identity, LogLine, ParsedCommand};
use crate::ports::{ChatLogPort, ChatTransport, DiagnosticSink, IssueTrackerPort};
use crate::shared::config::BotConfig;
use crate::usecases::{command_parser, issue_presenter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wait between losing the session and the next connect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Identifying,
    Joining,
    Joined,
}

/// Connection manager. Holds the transport exclusively; everything else is shared.
pub struct ConnectionManager {
    config: Arc<BotConfig>,
    transport: Box<dyn ChatTransport>,
    tracker: Arc<dyn IssueTrackerPort>,
    chat_log: Arc<dyn ChatLogPort>,
    diagnostics: Arc<dyn DiagnosticSink>,
    state: ConnectionState,
    reconnect_delay: Duration,
    connect_attempts: u64,
}

impl ConnectionManager {
    pub fn new(
        config: Arc<BotConfig>,
        transport: Box<dyn ChatTransport>,
        tracker: Arc<dyn IssueTrackerPort>,
        chat_log: Arc<dyn ChatLogPort>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            config,
            transport,
            tracker,
            chat_log,
            diagnostics,
            state: ConnectionState::Disconnected,
            reconnect_delay: RECONNECT_DELAY,
            connect_attempts: 0,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of `connect_and_join` calls so far.
    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts
    }

    /// Connect, identify (when a secret is configured), join the channel.
    /// Any failing step leaves the manager `Disconnected`.
    pub async fn connect_and_join(&mut self) -> Result<(), DomainError> {
        self.connect_attempts = self.connect_attempts.saturating_add(1);
        let result = self.try_connect_and_join().await;
        if result.is_err() {
            self.state = ConnectionState::Disconnected;
        }
        result
    }

    async fn try_connect_and_join(&mut self) -> Result<(), DomainError> {
        let identity = Identity::from_name(&self.config.name);

        self.state = ConnectionState::Connecting;
        self.transport
            .connect(&self.config.server, &identity)
            .await?;

        if let Some(secret) = self.config.identify.as_deref() {
            self.state = ConnectionState::Identifying;
            self.transport.identify(secret).await?;
        }

        self.state = ConnectionState::Joining;
        self.transport.join(&self.config.channel).await?;

        self.state = ConnectionState::Joined;
        info!(
            server = %self.config.server,
            channel = %self.config.channel,
            nick = %self.transport.current_nick(),
            "joined channel"
        );
        Ok(())
    }

    /// Run forever: connect, serve the session until it drops, wait, reconnect.
    /// There is no retry limit and no backoff growth.
    pub async fn run(&mut self) {
        loop {
            match self.connect_and_join().await {
                Ok(()) => self.serve_session().await,
                Err(e) => warn!(attempt = self.connect_attempts, error = %e, "connect failed"),
            }
            self.state = ConnectionState::Disconnected;
            info!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "disconnected; reconnecting after delay"
            );
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Pump events until the transport reports the session gone.
    async fn serve_session(&mut self) {
        loop {
            let event = match self.transport.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "transport error");
                    ChatEvent::Disconnected
                }
            };
            self.handle_event(event).await;
            if self.state == ConnectionState::Disconnected {
                return;
            }
        }
    }

    /// Handle one event to completion. Channel messages are written to the
    /// transcript before any command interpretation.
    pub async fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::MessageReceived {
                channel,
                sender,
                text,
            } => {
                self.record(LogLine::message(&sender.nick, &text)).await;
                let command = command_parser::parse(&text);
                if command != ParsedCommand::None {
                    debug!(channel = %channel, sender = %sender.nick, command = ?command, "command received");
                    self.handle_command(command).await;
                }
            }
            ChatEvent::Joined { channel, sender } => {
                self.record(LogLine::Joined { sender, channel }).await;
            }
            ChatEvent::Parted { channel, sender } => {
                self.record(LogLine::Parted { sender, channel }).await;
            }
            ChatEvent::Quit { sender, reason } => {
                self.record(LogLine::Quit { sender, reason }).await;
            }
            ChatEvent::Disconnected => {
                info!(server = %self.config.server, "session lost");
                self.state = ConnectionState::Disconnected;
            }
        }
    }

    async fn handle_command(&mut self, command: ParsedCommand) {
        let lines = match &command {
            ParsedCommand::ShowIssue(number) => self
                .tracker
                .get_issue(*number)
                .await
                .map(|issue| issue_presenter::format_issue(&issue)),
            ParsedCommand::ListOpenIssues { start, keywords } => {
                self.tracker.list_open_issues().await.map(|issues| {
                    let matching = issue_presenter::filter_open_issues(&issues, keywords);
                    issue_presenter::paginate(matching, *start, self.config.open_page_size)
                        .into_iter()
                        .map(issue_presenter::format_issue_summary)
                        .collect::<Vec<_>>()
                })
            }
            ParsedCommand::None => return,
        };

        let lines = match lines {
            Ok(lines) => lines,
            Err(e) => {
                self.diagnostics.tracker_failed(&command, &e);
                return;
            }
        };

        for line in lines {
            if let Err(e) = self.send_and_log(&line).await {
                warn!(error = %e, "failed to send reply; dropping the rest");
                return;
            }
        }
    }

    /// Send one line to the channel and record it under the bot's current nick.
    async fn send_and_log(&mut self, line: &str) -> Result<(), DomainError> {
        self.transport
            .send_message(&self.config.channel, line)
            .await?;
        let nick = self.transport.current_nick();
        self.record(LogLine::message(nick, line)).await;
        Ok(())
    }

    async fn record(&self, line: LogLine) {
        if let Err(e) = self.chat_log.append(&line).await {
            self.diagnostics.chat_log_failed(&line, &e);
        }
    }
}
