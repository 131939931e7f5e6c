//! # API Error Type
//!
//! Unified error type for the orchestration layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in Shopkeeper                            │
//! │                                                                         │
//! │  Caller                       Service Function                          │
//! │  ──────                       ────────────────                          │
//! │                                                                         │
//! │  submit_order(...)                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Storage error?  ── DbError ───────────────────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │  Business error? ── CoreError ─────────────────── ApiError ────►│  │
//! │  │         │                                          │            │  │
//! │  │  CSV error?      ── csv::Error ────────────────────┘            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Every ApiError carries a machine code and a display message:          │
//! │  { "code": "INSUFFICIENT_STOCK", "message": "Cap: available 1, ..." }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shopkeeper_core::CoreError;
use shopkeeper_db::DbError;

/// API error returned from service functions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business logic error
    BusinessLogic,

    /// Internal error
    Internal,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Credential check failed
    InvalidCredentials,

    /// Import/export file could not be processed
    FileTransferError,

    /// Startup configuration missing or malformed
    ConfigError,
}

/// Result type alias for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(entity, &id),
            DbError::InsufficientStock(shortages) => ApiError::new(
                ErrorCode::InsufficientStock,
                shopkeeper_core::format_shortages(&shortages),
            ),
            DbError::CorruptDocument { key, source } => {
                tracing::error!(key, %source, "corrupt settings document");
                ApiError::new(
                    ErrorCode::Internal,
                    format!("Stored configuration '{}' is unreadable", key),
                )
            }
            DbError::SerializeDocument { key, source } => {
                tracing::error!(key, %source, "settings document failed to serialize");
                ApiError::internal("Configuration could not be saved")
            }
            DbError::Sqlx(e) => {
                // Log the actual error but return a generic message
                tracing::error!("database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Migration(e) => {
                tracing::error!("migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::InsufficientStock(shortages) => ApiError::new(
                ErrorCode::InsufficientStock,
                shopkeeper_core::format_shortages(shortages),
            ),
            CoreError::InvalidCredentials => {
                // One generic message: no hint whether the username or the
                // password failed.
                ApiError::new(ErrorCode::InvalidCredentials, "Invalid credentials")
            }
            CoreError::EmptyCart | CoreError::NoClientSelected => {
                ApiError::new(ErrorCode::CartError, err.to_string())
            }
            CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::NotInCart(_) => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::DiscountExceedsSubtotal { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts startup configuration errors to API errors.
impl From<crate::state::ConfigError> for ApiError {
    fn from(err: crate::state::ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Converts CSV errors to API errors.
impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::new(
            ErrorCode::FileTransferError,
            format!("File could not be processed: {}", err),
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeeper_core::StockShortage;

    #[test]
    fn test_shortage_error_lists_lines() {
        let err: ApiError = DbError::InsufficientStock(vec![StockShortage {
            product_id: "p1".to_string(),
            product_name: "Cap".to_string(),
            requested: 5,
            available: 1,
            missing: false,
        }])
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Cap: available 1, requested 5"));
    }

    #[test]
    fn test_config_error_carries_variable_name() {
        let err: ApiError = crate::state::ConfigError::Missing {
            name: "SHOPKEEPER_DB_PATH",
            hint: "point it at the SQLite database file",
        }
        .into();

        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.message.contains("SHOPKEEPER_DB_PATH"));
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        let err: ApiError = CoreError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.message, "Invalid credentials");
    }
}
