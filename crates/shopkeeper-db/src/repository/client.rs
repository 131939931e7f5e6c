//! # Client Repository
//!
//! CRUD over the `clients` table. Orders snapshot client fields at
//! submission, so edits and deletes here never touch history.

use chrono::Utc;
use shopkeeper_core::{Client, ClientInput};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for client operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists all clients, newest first.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document_id, phone, address, created_at
            FROM clients
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Fetches one client by ID.
    pub async fn get(&self, id: &str) -> DbResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document_id, phone, address, created_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("client", id))
    }

    /// Creates or replaces a client. Same id semantics as the product
    /// repository: `None` generates, known overwrites, unknown inserts.
    pub async fn upsert(&self, id: Option<String>, input: ClientInput) -> DbResult<Client> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, document_id, phone, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                document_id = excluded.document_id,
                phone = excluded.phone,
                address = excluded.address
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.document_id)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(client_id = %id, name = %input.name, "client upserted");
        self.get(&id).await
    }

    /// Deletes a client by ID. Absent id is a no-op success.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(client_id = %id, "delete of absent client, no-op");
        } else {
            info!(client_id = %id, "client deleted");
        }

        Ok(())
    }

    /// Number of registered clients.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
