mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::sync::Arc;

use anyhow::Context;
use bell_proto::config::Config;
use bell_proto::NotificationClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = bell_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("bell.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("bell log: {}", log_path.display());

    tracing::info!("bell starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {:#}; using defaults", e);
        Config::default()
    });
    tracing::info!(
        "server {} (api {})",
        config.server.base_url,
        config.server.api_base
    );

    // ── Notification client ──────────────────────────────────────────────────
    let client = NotificationClient::new(&config.server).context("building notification client")?;

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(Arc::new(client), config.ui);
    app.run().await?;

    Ok(())
}
