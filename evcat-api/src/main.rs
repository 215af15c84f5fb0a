//! evcat-api - events catalog HTTP service
//!
//! Configuration priority: command line, then environment, then TOML file,
//! then built-in defaults.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evcat_api::search::geocode::geocoder_from_config;
use evcat_api::search::SearchOptions;
use evcat_api::{build_router, AppState};
use evcat_common::config::{ConfigOverrides, ServiceConfig};
use evcat_common::db::init_database;

/// Command-line arguments for evcat-api
#[derive(Parser, Debug)]
#[command(name = "evcat-api")]
#[command(about = "Events catalog search service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Geocoding service API key
    #[arg(long)]
    geocoder_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evcat_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting evcat-api v{}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::load(ConfigOverrides {
        port: args.port,
        database_path: args.database,
        config_file: args.config,
        geocoder_api_key: args.geocoder_api_key,
    })
    .context("Failed to load configuration")?;

    info!("Database path: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open database")?;

    let geocoder =
        geocoder_from_config(&config.geocoder).context("Failed to initialize geocoder")?;
    let state = AppState::new(pool, geocoder, SearchOptions::from_config(&config));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
