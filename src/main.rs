use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use vidshare_api::auth::SessionKeys;
use vidshare_api::config::config;
use vidshare_api::database::{manager, MemoryStore, PgSettings, PgStore, Store};
use vidshare_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vidshare_api=info,tower_http=info")),
        )
        .init();

    let config = config();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Starting vidshare-api in {:?} mode", config.environment);

    let keys = SessionKeys::from_config(&config.security).context("session keys")?;

    let database = if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        None
    } else {
        let settings = PgSettings::from_config(&config.database)?;
        Some(manager::shared(settings))
    };
    let store: Arc<dyn Store> = match database {
        Some(database) => Arc::new(PgStore::new(database)),
        None => Arc::new(MemoryStore::new()),
    };

    let router = app(AppState::new(store, keys), config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("vidshare-api listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server")?;

    if let Some(database) = database {
        manager::close(database).await;
    }
    tracing::info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
