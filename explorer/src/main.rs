//! Wallet Explorer - Main entry point

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;
use wallet_explorer::{
    api::ApiServer,
    cli,
    config::{Config, LoggingConfig},
    database::Database,
    events::EventPipeline,
    websocket::SubscriberRegistry,
};

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::parse_args();

    let mut config = match &args.config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_env_overrides()?;
    config.apply_cli_overrides(&args);
    config.validate()?;

    init_tracing(&config.logging);
    info!("Starting wallet explorer");

    let database = Database::new(&config.database).await?;
    info!("Connected to database");

    if config.database.run_migrations {
        database.migrate().await?;
        info!("Database migrations completed");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = signal_tx.send(true);
            }
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    let registry = Arc::new(SubscriberRegistry::new());
    let pipeline = EventPipeline::spawn(&database, &config.listener, registry.clone(), shutdown_rx.clone());

    let api_server = ApiServer::new(database.clone(), registry, &config);
    let served = api_server.start(shutdown_rx).await;
    if let Err(e) = &served {
        error!("API server error: {}", e);
    }
    let _ = shutdown_tx.send(true);

    pipeline.join().await;
    database.close().await;
    info!("Wallet explorer stopped");

    served.map_err(Into::into)
}
