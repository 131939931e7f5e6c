//! # shopkeeper-app: Orchestration Layer for Shopkeeper
//!
//! Ties the pure logic in shopkeeper-core and the storage in shopkeeper-db
//! together into the operations the shop performs.
//!
//! ## Module Organization
//! ```text
//! shopkeeper_app/
//! ├── lib.rs             ◄─── You are here (bootstrap & logging)
//! ├── state/
//! │   ├── cart.rs        ◄─── Thread-safe cart state
//! │   └── config.rs      ◄─── Environment configuration
//! ├── services/
//! │   ├── auth.rs        ◄─── Login, operator administration
//! │   ├── checkout.rs    ◄─── Cart → persisted order
//! │   ├── spreadsheet.rs ◄─── CSV import/export
//! │   └── receipt.rs     ◄─── Plain-text receipt rendering
//! └── error.rs           ◄─── API error type
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          RUST_LOG-controlled structured logging      │
//! │  2. bootstrap()             resolve env config (SHOPKEEPER_DB_PATH      │
//! │                             required), open SQLite (WAL), migrate       │
//! │  3. CartState::new()        empty cart behind a mutex                   │
//! │  4. serve                   hand Database + CartState to the frontend   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod services;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shopkeeper_db::{Database, DbConfig};

pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{AppConfig, CartState, CartTotals, ConfigError};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopkeeper=trace` - Trace for shopkeeper crates only
/// - Default: INFO level, sqlx noise suppressed
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shopkeeper=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves configuration from the environment and opens the database.
pub async fn bootstrap() -> ApiResult<(AppConfig, Database)> {
    let config = AppConfig::from_env()?;
    let db = open_database(&config).await?;
    Ok((config, db))
}

/// Opens the database from an already-resolved configuration.
pub async fn open_database(config: &AppConfig) -> ApiResult<Database> {
    info!(path = %config.db_path.display(), "starting shopkeeper");
    let db = Database::new(DbConfig::new(&config.db_path)).await?;
    Ok(db)
}
