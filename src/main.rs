//! resonance: live R(t) monitoring dashboard.
//!
//! Run with:  `RUST_LOG=info resonance`
//!
//! Type `1h`, `24h`, `7d` or `30d` on stdin to switch the chart window;
//! Ctrl-C stops.

use anyhow::{Context, Result};
use resonance_core::TimeWindow;
use resonance_scheduler::{Dashboard, LogRenderer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Structured logging: RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("resonance v{} starting", env!("CARGO_PKG_VERSION"));

    let path = resonance_config::default_path();
    let config = resonance_config::load(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let handle = Dashboard::from_config(&config, LogRenderer)?.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("listening for Ctrl-C")?;
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<TimeWindow>() {
                    Ok(window) => handle.select_window(window).await?,
                    Err(e) => warn!("{e}"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("stdin closed: {e}");
                    stdin_open = false;
                }
            },
        }
    }

    let dashboard = handle.stop().await?;
    tracing::info!(samples = dashboard.store().len(), "resonance stopped");
    Ok(())
}
