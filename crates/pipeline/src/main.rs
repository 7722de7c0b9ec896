//! Runnable harness for the preference pipeline.
//!
//! Wires the Redis event source, the HTTP candidate lookup, and the Redis
//! recommendation sink from the environment configuration, then runs the
//! driver until ctrl-c.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use clients::{HttpLookupClient, RedisEventSource, RedisSink};
use pipeline::{PipelineConfig, PipelineDriver};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig::from_env().context("Failed to read pipeline configuration")?;
    info!(
        "Starting preference pipeline ({}s windows, top-{}, stream '{}')",
        config.window.as_secs(),
        config.top_k,
        config.event_stream
    );

    let lookup = Arc::new(HttpLookupClient::new(config.lookup_url.clone()));
    let sink = Arc::new(
        RedisSink::connect(&config.redis_url, config.recs_key.clone())
            .await
            .context("Failed to connect recommendation sink")?,
    );
    let source = RedisEventSource::connect(&config.redis_url, config.event_stream.clone())
        .await
        .context("Failed to connect event source")?;

    let (event_tx, event_rx) = mpsc::channel(1024);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reader = tokio::spawn(async move {
        if let Err(e) = source.run(event_tx).await {
            warn!("Event source stopped: {}", e);
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let driver = PipelineDriver::new(config.window, config.top_k, lookup, sink);
    driver.run(event_rx, shutdown_rx).await?;

    reader.abort();
    Ok(())
}
