//! # Migrations
//!
//! Schema migrations embedded at compile time from the `migrations/`
//! directory. The binary carries its own schema; a fresh database file is
//! brought up to date on first open, and already-applied migrations are
//! skipped via sqlx's `_sqlx_migrations` bookkeeping table.

/// Embedded migrator. Applied by [`crate::Database::new`].
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
