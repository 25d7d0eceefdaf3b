use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;

/// Errors that can occur while opening the storage handle
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Connection pool tuning
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub statement_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            statement_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&DatabaseSettings> for PoolOptions {
    fn from(settings: &DatabaseSettings) -> Self {
        let defaults = PoolOptions::default();
        Self {
            max_connections: settings.max_connections.unwrap_or(defaults.max_connections),
            min_connections: settings.min_connections.unwrap_or(defaults.min_connections),
            acquire_timeout: settings
                .acquire_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: settings
                .idle_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            statement_timeout: settings
                .statement_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.statement_timeout),
        }
    }
}

/// Storage handle shared by every component
///
/// Opened once at process start, cloned into each component, and closed on
/// shutdown. Cloning is cheap: the pool is reference counted.
#[derive(Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Open the pool and bring the schema up to date
    ///
    /// Acquiring a connection is bounded by `acquire_timeout`, and every
    /// statement by a server-side `statement_timeout`, so a stuck query aborts
    /// and rolls back its transaction instead of hanging the request.
    pub async fn connect(database_url: &str, options: PoolOptions) -> Result<Self, PostgresError> {
        let connect_options = PgConnectOptions::from_str(database_url)?.options([(
            "statement_timeout",
            options.statement_timeout.as_millis().to_string(),
        )]);

        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .acquire_timeout(options.acquire_timeout)
            .idle_timeout(options.idle_timeout)
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create the storage handle from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        let options = PoolOptions::from(settings);
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections, acquire timeout: {:?})",
            options.max_connections,
            options.acquire_timeout
        );

        Self::connect(&settings.url, options).await
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
