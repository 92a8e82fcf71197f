mod args;
mod client_addr;
mod config;
mod error;
mod routes;
mod templates;
mod version;

use anyhow::{Context, Result};
use args::Arguments;
use clap::Parser;
use config::Config;
use routes::AppState;
use std::{net::SocketAddr, path::Path, sync::Arc};
use templates::Templates;
use tracing::{info, trace};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Arguments::parse();
    let config = match args.config_path.as_deref() {
        Some(config_path) => read_config(config_path).await?,
        None => Config::default(),
    };
    trace!("Config: {:#?}", config);

    let version = version::get_version();
    info!("Bootstrapper version: {}", version);

    let state = AppState {
        templates: Arc::new(Templates::from_dir(config.templates.clone())),
        version: Arc::from(version),
        ip_source: config.ip_source,
    };
    let app = routes::build(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind listener to: {}", config.listen))?;
    info!("listening on {}", config.listen);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .with_context(|| "server terminated unexpectedly")?;

    info!("Server shut down.");

    Ok(())
}

async fn read_config(config_path: &Path) -> Result<Config> {
    let config_file = tokio::fs::read_to_string(config_path)
        .await
        .with_context(|| format!("failed to read config from path: {}", config_path.display()))?;

    serde_yaml::from_str(&config_file).with_context(|| "failed to parse valid config YAML from file")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
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

    info!("Shutdown signal received; draining connections.");
}
