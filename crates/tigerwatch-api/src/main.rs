//! tigerwatch server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `TIGERWATCH_*` environment variables, opens the SQLite store, starts the
//! notification workers and serves the JSON API. On Ctrl-C the server stops
//! accepting requests, finishes in-flight ones, then drains the
//! notification queue before exiting.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tigerwatch_api::{AppState, ServerConfig};
use tigerwatch_notify::NotificationService;
use tigerwatch_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "tigerwatch sighting server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Nested keys use `__`, e.g. TIGERWATCH_NOTIFICATIONS__WORKERS=4.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("TIGERWATCH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let mut notifications = NotificationService::simulated(server_cfg.notifications.clone())
    .context("invalid [notifications] config")?;
  notifications.start().context("failed to start notification workers")?;

  let state = AppState::new(Arc::new(store), &server_cfg, notifications.queue())
    .context("invalid server config")?;
  let app = tigerwatch_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(
    radius_m = server_cfg.sighting_radius_meters.meters(),
    workers  = server_cfg.notifications.workers,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  let report = notifications.stop(true).await;
  tracing::info!(
    delivered = report.delivery.delivered,
    failed    = report.delivery.failed,
    dropped   = report.dropped,
    "shutdown complete"
  );
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
