//! Wiring & DI. Entry point: load config, bootstrap adapters, inject into the
//! connection manager, run forever. No business logic here.

use clap::Parser;
use dotenv::dotenv;
use irc_issue_bot::adapters::diagnostics::TracingDiagnostics;
use irc_issue_bot::adapters::github::GithubIssueTracker;
use irc_issue_bot::adapters::irc::IrcTransport;
use irc_issue_bot::adapters::persistence::FileChatLog;
use irc_issue_bot::ports::{ChatLogPort, DiagnosticSink, IssueTrackerPort};
use irc_issue_bot::shared::config::{BotConfig, DEFAULT_CONFIG_FILE};
use irc_issue_bot::usecases::ConnectionManager;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// IRC bot that logs one channel and answers issue lookups.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Properties file with name, server, channel, identify and github.* keys.
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = &env_loaded {
        info!(path = %path.display(), "loaded .env");
    }

    let cfg = BotConfig::load(&cli.config)
        .map_err(|e| anyhow::anyhow!("Config file {} is invalid: {}", cli.config, e))?;
    info!(
        config = %cli.config,
        name = %cfg.name,
        server = %cfg.server,
        channel = %cfg.channel,
        log_dir = %cfg.log_dir.display(),
        repo = %format!("{}/{}", cfg.github.owner, cfg.github.repo),
        "configuration loaded"
    );

    // --- Adapters ---
    let tracker: Arc<dyn IssueTrackerPort> = Arc::new(
        GithubIssueTracker::new(&cfg.github).map_err(|e| anyhow::anyhow!("{}", e))?,
    );
    let chat_log: Arc<dyn ChatLogPort> =
        Arc::new(FileChatLog::new(&cfg.log_dir, cfg.channel.clone()));
    let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(TracingDiagnostics);
    let transport = Box::new(IrcTransport::new());

    // --- Run (connect, join, serve, reconnect; never returns) ---
    let mut manager =
        ConnectionManager::new(Arc::new(cfg), transport, tracker, chat_log, diagnostics);
    manager.run().await;

    Ok(())
}
