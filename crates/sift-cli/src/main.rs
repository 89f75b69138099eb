//! sift — a keyword-filtering relay between Telegram channels.
//!
//! Watches one monitored channel, tests each post against the configured
//! keyword rules, and copies matches to the sending channels. Configuration
//! is mutated at runtime through chat commands and persisted in the state
//! directory; an audit log of every user-visible action is kept alongside it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use sift_core::{normalize_handle, LocalClock};
use sift_runtime::{retention, RelayEngine};
use sift_store::{AuditLog, ConfigRepository, FsObjectStore};
use sift_telegram::TelegramClient;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "sift", about = "Keyword-filtering relay between Telegram channels")]
struct CliArgs {
    /// Telegram bot credential.
    #[arg(long, env = "SIFT_BOT_TOKEN")]
    bot_token: String,

    /// Directory backing the configuration and audit-log store.
    #[arg(long, env = "SIFT_STATE_DIR")]
    state_dir: PathBuf,

    /// JSON string array of always-authorized handles.
    #[arg(long, env = "SIFT_SUPER_ADMINS", default_value = "[]")]
    super_admins: String,

    /// IANA timezone used for audit-log day boundaries.
    #[arg(long, env = "SIFT_TIMEZONE", default_value = "Asia/Shanghai")]
    timezone: String,

    /// Telegram Bot API base URL.
    #[arg(long, env = "SIFT_API_BASE", default_value = "https://api.telegram.org")]
    api_base: String,

    /// Long-poll timeout handed to getUpdates, in seconds.
    #[arg(long, env = "SIFT_POLL_TIMEOUT_SECS", default_value_t = 30)]
    poll_timeout_secs: u64,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Malformed input degrades to an empty set rather than failing startup.
fn parse_super_admins(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(handles) => handles
            .iter()
            .filter_map(|handle| normalize_handle(handle))
            .collect(),
        Err(error) => {
            tracing::warn!(
                "super-admin list is not a JSON string array ({error}); continuing with none"
            );
            Vec::new()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let timezone: chrono_tz::Tz = args
        .timezone
        .parse()
        .map_err(|_| anyhow!("unknown timezone '{}'", args.timezone))?;
    let super_admins = parse_super_admins(&args.super_admins);
    if super_admins.is_empty() {
        tracing::warn!("no super admins configured; only persisted admins can run commands");
    }

    let clock = Arc::new(LocalClock::new(timezone));
    let store = Arc::new(
        FsObjectStore::open(&args.state_dir)
            .with_context(|| format!("failed to open state dir {}", args.state_dir.display()))?,
    );
    let repository = ConfigRepository::new(store.clone(), super_admins.clone());
    let audit = AuditLog::new(store, clock.clone());
    let client = TelegramClient::new(&args.api_base, &args.bot_token)?;
    let engine = RelayEngine::new(
        Arc::new(client.clone()),
        repository,
        audit.clone(),
        super_admins,
    );

    tokio::spawn(retention::run_retention_loop(audit, clock));
    tracing::info!("sift connected; polling for updates");

    let mut offset = 0u64;
    loop {
        let updates = match client.get_updates(offset, args.poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(error) => {
                tracing::warn!("getUpdates failed: {:#}", error);
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };
        for update in updates {
            offset = offset.max(update.update_id.saturating_add(1));
            if let Err(error) = engine.handle_update(&update).await {
                tracing::warn!("failed to handle update {}: {:#}", update.update_id, error);
            }
        }
    }
}
