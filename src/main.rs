//! Playlist relay server.
//!
//! Reads its configuration from the environment once, then serves the
//! login / callback / playlist routes until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use playlist_relay::http::{RelayConfig, relay_routes};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "playlist-relay")]
#[command(version)]
#[command(about = "OAuth2 relay that lets a web client browse Spotify playlists")]
#[command(long_about = "
Runs the authorization code flow server-side and proxies playlist reads,
so the browser never holds provider credentials.

Required environment:
  SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET, SPOTIFY_REDIRECT_URI, FRONTEND_URL
")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "playlist_relay=debug,tower_http=debug"
    } else {
        "playlist_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = RelayConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        client_id = config.oauth().client_id(),
        redirect_uri = %config.oauth().redirect_uri(),
        frontend_url = %config.frontend_url(),
        "Configuration loaded"
    );

    let app = relay_routes(config);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!("Playlist relay listening on {}", cli.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Playlist relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
