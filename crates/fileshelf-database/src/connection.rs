//! SQLite connection pool management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use fileshelf_core::config::DatabaseConfig;
use fileshelf_core::error::{AppError, ErrorKind};

/// Wrapper around the sqlx SQLite connection pool.
#[derive(Debug, Clone)]
pub struct CatalogPool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
}

impl CatalogPool {
    /// Create a new catalog pool from configuration.
    ///
    /// The database file is created when missing. WAL journaling and a
    /// busy timeout keep concurrent writers waiting instead of failing
    /// with "database is locked".
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Opening catalog database"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Invalid database URL '{}': {e}", config.url),
                    e,
                )
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to open catalog database: {e}"),
                    e,
                )
            })?;

        info!("Catalog database ready");
        Ok(Self { pool })
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return the underlying sqlx pool (consuming self).
    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Catalog pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory_and_health_check() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_seconds: 5,
            busy_timeout_seconds: 1,
        };
        let pool = CatalogPool::connect(&config).await.expect("connect");
        assert!(pool.health_check().await.expect("health check"));
        pool.close().await;
    }

    // A scheme-less URL is treated by sqlx as a relative filesystem path,
    // so the reliable failure is a parent directory that does not exist:
    // create_if_missing creates the file, never its directories.
    #[tokio::test]
    async fn test_connect_rejects_missing_parent_directory() {
        let config = DatabaseConfig {
            url: "sqlite:/nonexistent-dir/sub/catalog.db".to_string(),
            max_connections: 1,
            connect_timeout_seconds: 5,
            busy_timeout_seconds: 1,
        };
        let err = CatalogPool::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
