use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::memoizer::{ConnectionMemoizer, Connector};
use crate::config::DatabaseConfig;

/// Errors from the storage layer. Cloneable so one failed acquisition can be
/// handed to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Password hashing failed: {0}")]
    Password(String),

    #[error("Database connection is not ready")]
    NotReady,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("{0}")]
    Sqlx(Arc<sqlx::Error>),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::Sqlx(Arc::new(err))
    }
}

/// Fixed connection settings, captured once at process start.
#[derive(Debug, Clone)]
pub struct PgSettings {
    pub url: String,
    pub max_connections: u32,
    pub buffer_commands: bool,
    pub connection_timeout: Duration,
}

impl PgSettings {
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .clone()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        Ok(Self {
            url,
            max_connections: config.max_connections,
            buffer_commands: config.buffer_commands,
            connection_timeout: config.connection_timeout(),
        })
    }
}

/// Opens the PostgreSQL pool and bootstraps the schema.
pub struct PgConnector {
    settings: PgSettings,
}

impl PgConnector {
    pub fn new(settings: PgSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PgSettings {
        &self.settings
    }

    async fn verify(pool: &PgPool) -> Result<(), DatabaseError> {
        pool.acquire().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, DatabaseError> {
        let options: PgConnectOptions = self
            .settings
            .url
            .parse()
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.connection_timeout)
            .connect_lazy_with(options);

        if let Err(e) = Self::verify(&pool).await {
            // Release whatever the pool opened before the failure surfaced
            pool.close().await;
            return Err(e);
        }

        info!(
            max_connections = self.settings.max_connections,
            buffer_commands = self.settings.buffer_commands,
            "Created database pool"
        );
        Ok(pool)
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        name TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS videos (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        video_url TEXT NOT NULL,
        thumbnail_url TEXT NOT NULL,
        controls BOOLEAN NOT NULL DEFAULT TRUE,
        owner_id UUID NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

pub type Database = ConnectionMemoizer<PgConnector>;

/// Process-wide memoizer. The first call fixes the settings for the lifetime
/// of the process; later calls return the same instance.
pub fn shared(settings: PgSettings) -> &'static Database {
    static INSTANCE: OnceLock<Database> = OnceLock::new();
    INSTANCE.get_or_init(|| ConnectionMemoizer::new(PgConnector::new(settings)))
}

/// Closes the cached pool, if one was established.
pub async fn close(database: &Database) {
    match database.take() {
        Some(pool) => {
            pool.close().await;
            info!("Closed database pool");
        }
        None => warn!("No established database pool to close"),
    }
}
