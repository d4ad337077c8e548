// src/cli/serve.rs - `unibot serve`: HTTP server plus session sweeper

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::api::{self, ApiState};
use crate::infra::clock::SystemClock;
use crate::infra::config::Config;
use crate::infra::sweeper::run_sweeper;
use crate::provider::GeminiGateway;

pub async fn run_serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let gateway = GeminiGateway::from_config(&config.gateway)?;
    tracing::info!("Generation backend: gemini ({})", gateway.model());

    let store = super::build_store(&config);
    let orchestrator = Arc::new(super::build_orchestrator(
        &config,
        store.clone(),
        Arc::new(gateway),
    ));

    let (stop_tx, stop_rx) = watch::channel(false);
    let sweeper = tokio::spawn(run_sweeper(
        store.clone(),
        Arc::new(SystemClock),
        config.retention(),
        Duration::from_secs(config.sessions.sweep_interval_seconds),
        wait_for_stop(stop_rx),
    ));

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down");
        let _ = stop_tx.send(true);
    };

    let state = ApiState::new(orchestrator, &config.server);
    let served = api::start_server(&config.server, state, shutdown).await;

    // The server may exit on a bind error without ever signalling stop.
    sweeper.abort();
    let _ = sweeper.await;

    let dropped = store.len();
    store.clear();
    tracing::info!(dropped, "Session store cleared");

    served
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}
