/*!
 * GC Manager - Main Entry Point
 *
 * Starts the GC engine and serves the dashboard control channel over
 * WebSocket until interrupted.
 */

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use gc_manager::{init_tracing, GcManager, GcServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = ServerConfig::parse();

    info!("GC manager starting...");
    info!(
        total_memory = config.total_memory,
        tick_seconds = config.tick_seconds,
        push_interval_ms = config.push_interval_ms,
        seed = ?config.seed,
        "Configuration loaded"
    );

    let mut builder = GcManager::builder()
        .with_total_memory(config.total_memory)
        .with_tick_unit(config.tick_unit());
    if let Some(seed) = config.seed {
        builder = builder.with_seed(seed);
    }

    // Ledger initialization walks the whole memory space
    let manager = tokio::task::spawn_blocking(move || builder.build())
        .await
        .context("engine initialization task failed")?
        .context("failed to initialize GC manager")?;
    let manager = Arc::new(manager);

    let server = GcServer::bind(Arc::clone(&manager), config.listen_addr(), config.push_interval())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    info!("Dashboard endpoint: ws://{}", server.local_addr()?);

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tokio::task::spawn_blocking(move || manager.shutdown())
        .await
        .context("scheduler shutdown task failed")?;

    info!("GC manager stopped");
    Ok(())
}
