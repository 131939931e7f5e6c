//! # Connection Pool Management
//!
//! The [`Database`] handle: owns the SQLite connection pool, applies the
//! embedded migrations on open, and hands out repositories.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path)  /  DbConfig::in_memory()                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config)                                                  │
//! │  ├── open pool (WAL, foreign keys ON, create if missing)               │
//! │  ├── apply embedded migrations                                         │
//! │  └── ready                                                             │
//! │       │                                                                 │
//! │       ├── db.products() / db.clients() / db.orders() / db.settings()   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close() on shutdown                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::migrations::MIGRATOR;
use crate::repository::{ClientRepository, OrderRepository, ProductRepository, SettingsRepository};

// =============================================================================
// Configuration
// =============================================================================

/// Where and how to open the database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the database file; `None` means a private in-memory database.
    pub path: Option<PathBuf>,

    /// Maximum pool connections.
    pub max_connections: u32,

    /// Per-statement acquire timeout.
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Configuration for a file-backed database.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: Some(path.into()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Configuration for an in-memory database (tests).
    ///
    /// One connection, never recycled: an in-memory SQLite database lives
    /// exactly as long as its connection does.
    pub fn in_memory() -> Self {
        DbConfig {
            path: None,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// Database Handle
// =============================================================================

/// Shared handle over the connection pool.
///
/// Cheap to clone; all repositories borrow the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if missing) the database and applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = match &config.path {
            Some(path) => {
                info!(path = %path.display(), "opening database");
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .foreign_keys(true)
            }
            None => {
                debug!("opening in-memory database");
                SqliteConnectOptions::new()
                    .in_memory(true)
                    .foreign_keys(true)
            }
        };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        // In-memory databases vanish when their connection closes; pin the
        // single connection open for the lifetime of the pool.
        if config.path.is_none() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        MIGRATOR.run(&pool).await?;
        info!("database ready, migrations applied");

        Ok(Database { pool })
    }

    /// Product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Client repository.
    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.pool.clone())
    }

    /// Order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Settings repository.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// Raw pool access for ad-hoc queries (seed binary, tests).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verifies the connection is alive.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool, flushing WAL state.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database closed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory_and_migrate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.health_check().await.unwrap();

        // Counters are seeded by the initial migration.
        let counters: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_counters")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(counters, 2);

        db.close().await;
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        MIGRATOR.run(db.pool()).await.unwrap();
        db.close().await;
    }
}
