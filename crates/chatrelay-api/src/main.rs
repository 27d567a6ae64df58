//! Chat relay CLI and HTTP entry point.
//!
//! Binary name: `relay`
//!
//! Parses CLI arguments, loads `relay.toml`, then either serves the HTTP
//! relay or runs a maintenance command.

mod cli;
mod http;
mod state;

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use chatrelay_core::store::session_store::SessionStore;
use chatrelay_infra::config::{default_config_path, load_relay_config, resolve_data_dir};
use chatrelay_observe::{LogFormat, init_tracing, shutdown_tracing};
use chatrelay_types::config::RelayConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(cli.log_filter(), format, cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    let data_dir = resolve_data_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&data_dir));
    let config = load_relay_config(&config_path).await;

    let result = match cli.command {
        Commands::Serve { port, host } => serve(config, &data_dir, &host, port).await,
        Commands::Config => cli::config::show_config(&config, &config_path),
        Commands::Purge => cli::purge::purge(&config, &data_dir).await,
    };

    shutdown_tracing();
    result
}

async fn serve(config: RelayConfig, data_dir: &Path, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::init(config, data_dir).await?;
    let purger = spawn_purger(state.clone());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Relay listening on http://{addr}");

    let router = http::router::build_router(state);
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = purger {
        handle.abort();
    }
    tracing::info!("Server stopped");
    served.map_err(Into::into)
}

/// Periodically delete expired sessions. Disabled when the interval is zero.
fn spawn_purger(state: AppState) -> Option<JoinHandle<()>> {
    let interval = Duration::from_secs(state.config.store.purge_interval_secs);
    if interval.is_zero() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match state.manager.store().purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Session purge failed"),
            }
        }
    }))
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
