//! Bridge Oracle Server
//!
//! Relays gateway events between the main chain and the side chain, crediting
//! each cross-chain event at most once.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::file::StoreBackend;
use config::runtime::RuntimeConfig;
use config::{ConfigLoader, get_database_url};
use oracle_core::events::{EventChain, actuator_channel, event_queue};
use oracle_core::factory::ActuatorFactory;
use oracle_core::framework::DatabaseProcessor;
use oracle_core::gateway::HttpGatewayApi;
use oracle_core::processors::{EventTask, TransactionWorker};
use oracle_core::store::{KvStore, MemoryKvStore, NonceStatusStore, NonceStores, SqliteKvStore};
use oracle_core::submitter::{ChannelSubmitter, TransactionSubmitter};
use server::{build_router, run_server};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Bridge Oracle - cross-chain event relay
#[derive(Parser, Debug)]
#[command(name = "oracle-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./oracle-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting oracle-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen);
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Open the nonce status backend
    let (db_pool, stores) = open_stores(&config, args.migrate).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Transaction worker
    let gateway = Arc::new(HttpGatewayApi::new(
        config.gateway.main_chain_endpoint.clone(),
        config.gateway.side_chain_endpoint.clone(),
        config.gateway.request_timeout,
    ));
    let (actuator_tx, actuator_rx) = actuator_channel();
    let submitter: Arc<dyn TransactionSubmitter> = Arc::new(ChannelSubmitter::new(actuator_tx));
    let worker = TransactionWorker::new(
        gateway,
        stores.clone(),
        actuator_rx,
        shutdown_rx.clone(),
        config.max_concurrency,
    );
    let mut handles = vec![tokio::spawn(worker.run())];

    // One event loop per chain
    let factory = ActuatorFactory::new(
        config.gateway.main_chain_gateway,
        config.gateway.side_chain_gateway,
    );
    let (main_pub, main_source, _) = event_queue(config.queue_buffer, config.batch_size);
    let (side_pub, side_source, _) = event_queue(config.queue_buffer, config.batch_size);
    for (chain, source) in [
        (EventChain::MainChain, main_source),
        (EventChain::SideChain, side_source),
    ] {
        let task = EventTask::new(
            chain,
            source,
            factory.clone(),
            stores.clone(),
            submitter.clone(),
            shutdown_rx.clone(),
        );
        handles.push(tokio::spawn(task.run()));
    }
    // The worker's channel closes once both event loops are gone.
    drop(submitter);

    // Build the router
    let router = build_router(AppState::new(main_pub, side_pub, stores));

    // Run the server
    tracing::info!("Starting HTTP server on {}", config.listen);
    let result = run_server(router, config.listen).await;

    // Stop the processors and wait for in-flight work
    let _ = shutdown_tx.send(true);
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!("Processor task failed: {}", e);
        }
    }

    if let Some(pool) = db_pool {
        tracing::info!("Closing database connections...");
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Build one nonce status store per chain on the configured backend.
async fn open_stores(
    config: &RuntimeConfig,
    migrate: bool,
) -> anyhow::Result<(Option<SqlitePool>, NonceStores)> {
    let (pool, main_kv, side_kv): (Option<SqlitePool>, Arc<dyn KvStore>, Arc<dyn KvStore>) =
        match config.store_backend {
            StoreBackend::Sqlite => {
                // Get database URL from environment
                let database_url = get_database_url().map_err(|e| {
                    tracing::error!("DATABASE_URL environment variable not set");
                    e
                })?;

                tracing::info!("Connecting to database...");
                let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
                let db_pool = SqlitePoolOptions::new()
                    .max_connections(5)
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to database: {}", e);
                        e
                    })?;
                tracing::info!("Database connection established");

                if migrate {
                    tracing::info!("Running database migrations...");
                    sqlx::migrate!("../migrations")
                        .run(&db_pool)
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to run migrations: {}", e);
                            e
                        })?;
                    tracing::info!("Migrations completed successfully");
                }

                let db = DatabaseProcessor::new(db_pool.clone());
                let main_kv: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(
                    db.clone(),
                    EventChain::MainChain.namespace(),
                ));
                let side_kv: Arc<dyn KvStore> =
                    Arc::new(SqliteKvStore::new(db, EventChain::SideChain.namespace()));
                (Some(db_pool), main_kv, side_kv)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory nonce store; processing state is lost on restart");
                let main_kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
                let side_kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
                (None, main_kv, side_kv)
            }
        };

    let stores = NonceStores {
        main_chain: Arc::new(NonceStatusStore::new(main_kv, config.retry_timeout)),
        side_chain: Arc::new(NonceStatusStore::new(side_kv, config.retry_timeout)),
    };
    Ok((pool, stores))
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
