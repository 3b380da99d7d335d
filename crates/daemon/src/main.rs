//! Tasklist Engine - Main Entry Point
//!
//! Composition root: wires the SQLite and filesystem adapters into the core
//! services, then runs the JSON-RPC server, the export worker, and the queue
//! maintenance loop until ctrl-c.

mod config;

use anyhow::Result;
use config::EngineConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tasklist_api_rpc::{RpcServer, RpcServerConfig};
use tasklist_core::application::export::{ExportPipeline, ExportService};
use tasklist_core::application::worker::{shutdown_channel, ExportWorker};
use tasklist_core::application::ListService;
use tasklist_core::port::id_provider::UuidProvider;
use tasklist_core::port::time_provider::SystemTimeProvider;
use tasklist_core::port::JobQueue;
use tasklist_infra_local::{FsObjectStore, OutboxMailer};
use tasklist_infra_sqlite::{
    create_pool, run_migrations, QueueConfig, SqliteIdentityDirectory, SqliteJobQueue,
    SqliteListStore,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const PURGE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("TASKLIST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("tasklist=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Tasklist Engine v{} starting...", VERSION);

    // 2. Load configuration (once; components never read env themselves)
    let config = EngineConfig::from_env();
    info!(db_path = %config.db_path, rpc_port = config.rpc_port, "Configuration loaded");

    // 3. Initialize database
    let pool = create_pool(&config.db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let list_store = Arc::new(SqliteListStore::new(pool.clone()));
    let identity_directory = Arc::new(SqliteIdentityDirectory::new(pool.clone()));
    let queue: Arc<dyn JobQueue> = Arc::new(SqliteJobQueue::new(
        pool.clone(),
        time_provider.clone(),
        id_provider.clone(),
        QueueConfig {
            visibility_timeout_ms: config.visibility_timeout_ms,
        },
    ));

    let object_store = Arc::new(FsObjectStore::new(
        config.artifact_root.clone(),
        config.artifact_base_url.clone(),
    ));
    let mailer = Arc::new(OutboxMailer::new(
        config.outbox_dir.clone(),
        config.sender_email.clone(),
    ));

    let pipeline = Arc::new(ExportPipeline::new(
        list_store.clone(),
        object_store,
        identity_directory,
        mailer,
        time_provider.clone(),
    ));

    let export_service = Arc::new(ExportService::new(queue.clone()));
    let list_service = Arc::new(ListService::new(
        list_store,
        id_provider.clone(),
        time_provider.clone(),
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: config.rpc_port,
        rate_limit_burst: config.rate_limit_burst,
        rate_limit_per_sec: config.rate_limit_per_sec,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, export_service, list_service, queue.clone());
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start export worker
    info!("Starting export worker...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let worker = ExportWorker::new(
        queue.clone(),
        pipeline,
        config.batch_size,
        config.max_attempts,
    );

    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker.run(shutdown_rx).await {
            tracing::error!(error = ?e, "Export worker failed");
        }
    });

    // 7. Queue maintenance: drop finished messages past retention
    let purge_queue = queue.clone();
    let retention_ms = config.purge_retention_days * MILLIS_PER_DAY;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            match purge_queue.purge_finished(retention_ms).await {
                Ok(purged) => info!(purged, "Queue maintenance completed"),
                Err(e) => tracing::error!(error = %e, "Queue maintenance failed"),
            }
        }
    });

    info!("System ready. Waiting for export requests...");
    info!("Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 9. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), worker_handle).await;

    info!("Shutdown complete.");

    Ok(())
}
