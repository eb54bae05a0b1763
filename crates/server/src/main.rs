use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use cinema_core::{
    config_path_from_env, load_config, validate_config, Catalog, Config, Environment,
    SqliteCatalog,
};
use cinema_server::{api::create_router, logging, state::AppState};

#[tokio::main]
async fn main() {
    // Logging depends on the configured environment, so config comes first.
    let config = match load_startup_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(Environment::default());
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    };

    logging::init(config.env);

    if let Err(e) = run(config).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_startup_config() -> Result<Config> {
    let config_path = config_path_from_env()?;
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    info!(env = config.env.as_str(), "Configuration loaded successfully");
    info!("Storage path: {:?}", config.storage.path);

    let catalog = Arc::new(
        SqliteCatalog::open(&config.storage.path).context("Failed to open catalog storage")?,
    );
    info!("Catalog initialized");

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(
        config,
        Arc::clone(&catalog) as Arc<dyn Catalog>,
    ));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    // The router has been dropped with the server, so this should be the last reference.
    match Arc::try_unwrap(catalog) {
        Ok(catalog) => {
            catalog.close().context("Failed to close catalog")?;
            info!("Catalog closed");
        }
        Err(_) => warn!("Catalog still referenced at shutdown, leaving it to drop"),
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
