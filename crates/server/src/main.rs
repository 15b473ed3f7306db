//! msgsearch server entry point.
//!
//! Loads configuration, warms the dataset cache from upstream and serves the
//! search API over HTTP. Logs are JSON on stderr.

use std::sync::Arc;

use anyhow::Result;
use msgsearch_client::{MessagesClient, RefreshOptions, Refresher, UpstreamConfig};
use msgsearch_core::{AppConfig, DatasetStore, Error};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::{AppState, DynFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().map_err(Error::from).inspect_err(|e| {
        tracing::error!(code = e.code(), error = %e, "invalid configuration");
    })?;

    let client = MessagesClient::new(UpstreamConfig::from_app_config(&config)?)?;
    tracing::info!(upstream = %client.messages_url(), "starting msgsearch");

    let fetcher: DynFetcher = Arc::new(client);
    let refresher = Refresher::new(DatasetStore::new(), fetcher, RefreshOptions::from_config(&config));
    let state = AppState::new(refresher);

    match state.refresh(false).await {
        Ok(snapshot) => tracing::info!(records = snapshot.len(), "dataset cache warmed"),
        Err(e) => tracing::warn!(error = %e, "failed to warm up cache"),
    }

    let app = routes::create_router(state, config.request_timeout());
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
