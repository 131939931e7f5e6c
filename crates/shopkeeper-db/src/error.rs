//! # Database Error Types
//!
//! Error handling for the storage layer. Wraps sqlx errors and adds
//! domain-specific failures the repositories can raise themselves.

use shopkeeper_core::StockShortage;
use thiserror::Error;

/// Errors that can occur in database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying sqlx error (connection, constraint, syntax).
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration failed to apply.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Row not found by ID.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Order submission found at least one line the shop cannot cover.
    ///
    /// Carries every offending line so the operator can fix the whole cart
    /// in one pass instead of discovering shortages one by one.
    #[error("insufficient stock: {}", shopkeeper_core::format_shortages(.0))]
    InsufficientStock(Vec<StockShortage>),

    /// A stored settings document failed to deserialize.
    #[error("corrupt settings document '{key}': {source}")]
    CorruptDocument {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A settings document failed to serialize (should not happen for the
    /// known document types).
    #[error("failed to serialize settings document '{key}': {source}")]
    SerializeDocument {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Convenience constructor for not-found errors.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
