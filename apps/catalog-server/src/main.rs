//! `catalog-server` binary entrypoint.
//!
//! Loads configuration, sets up logging and serves the tracking catalog.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracking_catalog::{CatalogModule, Config};

#[derive(Debug, Parser)]
#[command(name = "catalog-server", version, about = "Tracking plan catalog server")]
struct Cli {
    /// YAML configuration file; skipped when absent
    #[arg(short, long, default_value = "config/catalog.yaml")]
    config: PathBuf,

    /// Override `server.bind_addr`
    #[arg(long)]
    bind: Option<String>,

    /// Apply database migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.exists().then_some(cli.config.as_path());
    let mut config = Config::load(config_path)?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    logging::init_logging(&config.logging);
    match config_path {
        Some(path) => tracing::info!(path = %path.display(), "configuration loaded"),
        None => tracing::info!(path = %cli.config.display(), "configuration file not found; using defaults and environment"),
    }
    tracing::debug!(?config, "effective configuration");

    if cli.migrate_only {
        config.database.run_migrations = false;
        let module = CatalogModule::init(config).await?;
        module.migrate().await?;
        tracing::info!("migrations applied; exiting");
        return Ok(());
    }

    let module = CatalogModule::init(config).await?;
    let app = module.router();

    let bind_addr = module.config().server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "catalog server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("catalog server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
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
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
