//! # Application Configuration
//!
//! Startup configuration from the environment. A `.env` file is honored in
//! development; real deployments set the variables directly.
//!
//! ## Variables
//! - `SHOPKEEPER_DB_PATH` (required) - path to the SQLite database file
//! - `SHOPKEEPER_RECEIPT_WIDTH` (optional) - receipt column width, default 42

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Default receipt width in characters (58mm thermal paper).
pub const DEFAULT_RECEIPT_WIDTH: usize = 42;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} is not set ({hint})")]
    Missing { name: &'static str, hint: &'static str },

    #[error("environment variable {name} is malformed: {reason}")]
    Malformed { name: &'static str, reason: String },
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,

    /// Receipt column width in characters.
    pub receipt_width: usize,
}

impl AppConfig {
    /// Loads configuration from the environment, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine; variables may come from the real environment.
        if dotenvy::dotenv().is_ok() {
            debug!(".env file loaded");
        }

        Self::from_vars(
            std::env::var("SHOPKEEPER_DB_PATH").ok(),
            std::env::var("SHOPKEEPER_RECEIPT_WIDTH").ok(),
        )
    }

    /// Resolves configuration from already-read variable values.
    ///
    /// Split out of [`Self::from_env`] so the resolution rules are testable
    /// without mutating process environment.
    fn from_vars(
        db_path: Option<String>,
        receipt_width: Option<String>,
    ) -> Result<Self, ConfigError> {
        let db_path = db_path.ok_or(ConfigError::Missing {
            name: "SHOPKEEPER_DB_PATH",
            hint: "point it at the SQLite database file, e.g. /var/lib/shopkeeper/shop.db",
        })?;

        let receipt_width = match receipt_width {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Malformed {
                    name: "SHOPKEEPER_RECEIPT_WIDTH",
                    reason: format!("'{}' is not a positive number", raw),
                })?,
            None => DEFAULT_RECEIPT_WIDTH,
        };

        Ok(AppConfig {
            db_path: PathBuf::from(db_path),
            receipt_width,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
