//! TouchBridge agent entry point.
//!
//! Runs a session against the recording mock host and replays an event
//! script through it.  Useful for watching the gesture engine's decisions in
//! the log without a device attached.
//!
//! # Usage
//!
//! ```text
//! touchbridge-agent [--config PATH] [SCRIPT]
//!
//! Arguments:
//!   [SCRIPT]         JSON-lines event script [default: read from stdin]
//!
//! Options:
//!   --config <PATH>  Config file [default: platform config directory]
//! ```
//!
//! # Startup order
//!
//! 1. Parse the command line.
//! 2. Load `AgentConfig`; a missing file yields defaults.
//! 3. Install logging.  `RUST_LOG` wins over the configured `log_level`.
//! 4. Spawn the session, replay the script, drain the stroke queue, shut the
//!    session down and wait for it.  Ctrl-C stops the replay early; the
//!    session is still shut down cleanly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use touchbridge_agent::infrastructure::{
    config::load_config,
    host::mock::MockHost,
    replay::{parse_script, replay},
    session::InputSession,
};

/// Upper bound on waiting for queued strokes to play out before shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays remote input events through the TouchBridge gesture engine.
#[derive(Debug, Parser)]
#[command(name = "touchbridge-agent", version)]
struct Cli {
    /// Config file to load instead of the platform default.
    #[arg(long, env = "TOUCHBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-lines event script.  Read from stdin when omitted.
    script: Option<PathBuf>,
}

async fn read_script(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read script '{}'", path.display())),
        None => {
            let mut source = String::new();
            tokio::io::stdin()
                .read_to_string(&mut source)
                .await
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("failed to load config")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level)),
        )
        .init();

    info!("TouchBridge agent starting");

    let source = read_script(cli.script.as_ref()).await?;
    let entries = parse_script(&source)?;

    let host = Arc::new(MockHost::new());
    let (session, task) = InputSession::spawn(host.clone(), config.session_settings());

    tokio::select! {
        result = replay(&session, &entries) => {
            if let Err(e) = result {
                error!("replay stopped: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    match tokio::time::timeout(SHUTDOWN_GRACE, session.drain()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("session stopped before draining: {e}"),
        Err(_) => warn!(grace = ?SHUTDOWN_GRACE, "strokes still playing at shutdown"),
    }

    if session.shutdown().await.is_ok() {
        task.await.context("session task panicked")?;
    }

    info!(
        strokes = host.dispatched().len(),
        global_actions = host.actions().len(),
        "TouchBridge agent stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
