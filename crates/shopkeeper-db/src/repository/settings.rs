//! # Settings Repository
//!
//! Whole-document configuration storage. Each document (users, tickets)
//! lives as one JSON value under a fixed key: read in full, written in
//! full, defaults supplied when absent.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopkeeper_core::{TicketsConfig, UsersConfig, TICKETS_SETTINGS_KEY, USERS_SETTINGS_KEY};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

/// Repository for configuration documents.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the users document, or its defaults when never saved.
    pub async fn users(&self) -> DbResult<UsersConfig> {
        self.get_document(USERS_SETTINGS_KEY).await
    }

    /// Replaces the users document.
    pub async fn set_users(&self, users: &UsersConfig) -> DbResult<()> {
        self.set_document(USERS_SETTINGS_KEY, users).await
    }

    /// Loads the tickets document, or its defaults when never saved.
    pub async fn tickets(&self) -> DbResult<TicketsConfig> {
        self.get_document(TICKETS_SETTINGS_KEY).await
    }

    /// Replaces the tickets document.
    pub async fn set_tickets(&self, tickets: &TicketsConfig) -> DbResult<()> {
        self.set_document(TICKETS_SETTINGS_KEY, tickets).await
    }

    /// Loads one document by key, falling back to `T::default()` when the
    /// row does not exist.
    async fn get_document<T>(&self, key: &str) -> DbResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match raw {
            Some(json) => serde_json::from_str(&json).map_err(|source| DbError::CorruptDocument {
                key: key.to_string(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    /// Writes one document whole.
    async fn set_document<T>(&self, key: &str, value: &T) -> DbResult<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value).map_err(|source| DbError::SerializeDocument {
            key: key.to_string(),
            source,
        })?;

        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(key, "settings document saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shopkeeper_core::auth::OperatorCredential;

    #[tokio::test]
    async fn test_absent_documents_fall_back_to_defaults() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        let users = repo.users().await.unwrap();
        assert_eq!(users.admin.username, "admin");

        let tickets = repo.tickets().await.unwrap();
        assert!(!tickets.farewell_message.is_empty());
    }

    #[tokio::test]
    async fn test_documents_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        let mut users = repo.users().await.unwrap();
        users.operators.push(OperatorCredential {
            username: "ana".to_string(),
            password: "ana-pass".to_string(),
            active: true,
        });
        repo.set_users(&users).await.unwrap();

        let reloaded = repo.users().await.unwrap();
        assert_eq!(reloaded, users);

        let mut tickets = repo.tickets().await.unwrap();
        tickets.company_name = "La Tiendita".to_string();
        repo.set_tickets(&tickets).await.unwrap();
        assert_eq!(repo.tickets().await.unwrap().company_name, "La Tiendita");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("INSERT INTO settings (key, value, updated_at) VALUES ('users', '{not json', '2026-01-01T00:00:00Z')")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            db.settings().users().await,
            Err(DbError::CorruptDocument { .. })
        ));
    }
}
