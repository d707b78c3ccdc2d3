//! smsgated — SMS submission daemon.

use std::time::Duration;

use anyhow::{Context, Result};

use smsgate_core::config::SmsgateConfig;
use smsgate_services::{DeliveryQueue, DispatchStats, LogSender, MessageBirdSender};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    match SmsgateConfig::write_default_if_missing() {
        Ok(path) => tracing::debug!(path = %path.display(), "config file"),
        Err(e) => tracing::warn!(error = %e, "failed to write default config"),
    }
    let config = SmsgateConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        SmsgateConfig::default()
    });
    tracing::info!(
        capacity = config.queue.capacity,
        send_interval_ms = config.queue.send_interval_ms,
        enqueue_timeout_ms = config.queue.enqueue_timeout_ms,
        "smsgated starting"
    );

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Queue and dispatcher ─────────────────────────────────────────────────
    let (queue, pending) =
        DeliveryQueue::new(config.queue.capacity).context("failed to create delivery queue")?;
    let stats = DispatchStats::new();

    let dispatcher_task = if config.gateway.access_key.is_empty() {
        tracing::warn!("no gateway access key configured; segments are logged, not sent");
        DeliveryQueue::start(
            pending,
            config.queue.send_interval(),
            LogSender,
            stats.clone(),
            shutdown_tx.subscribe(),
        )
    } else {
        let sender = MessageBirdSender::new(
            &config.gateway.endpoint,
            config.gateway.access_key.clone(),
            config.gateway.request_timeout(),
        )
        .context("failed to build gateway client")?;
        tracing::info!(endpoint = %config.gateway.endpoint, "gateway client ready");
        DeliveryQueue::start(
            pending,
            config.queue.send_interval(),
            sender,
            stats.clone(),
            shutdown_tx.subscribe(),
        )
    };

    let stats_printer = {
        let stats = stats.clone();
        let queue = queue.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(10));
            loop {
                interval.tick().await;
                tracing::info!(depth = queue.len(), "queue snapshot");
                stats.log_stats();
            }
        })
    };

    // ── HTTP API ─────────────────────────────────────────────────────────────
    let state = smsgate_api::ApiState {
        queue,
        stats,
        enqueue_timeout: config.queue.enqueue_timeout(),
        send_interval: config.queue.send_interval(),
    };
    let api_task = {
        let shutdown = shutdown_tx.subscribe();
        let bind = config.server.bind.clone();
        let port = config.server.port;
        tokio::spawn(async move {
            if let Err(e) = smsgate_api::serve(state, &bind, port, shutdown).await {
                tracing::error!(error = %e, "API server failed");
            }
        })
    };

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv()  => tracing::info!("shutting down"),
        r = dispatcher_task     => tracing::error!("dispatcher exited: {:?}", r),
        r = api_task            => tracing::error!("API server exited: {:?}", r),
        r = stats_printer       => tracing::error!("stats printer exited: {:?}", r),
    }

    Ok(())
}
