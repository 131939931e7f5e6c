//! # Product Repository
//!
//! CRUD over the `products` table. Stock mutation at checkout happens in the
//! order repository's transaction, not here.

use chrono::Utc;
use shopkeeper_core::{Product, ProductInput};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for product operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, color, stock, cost_cents, sale_price_cents,
                   image_url, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fetches one product by ID.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, color, stock, cost_cents, sale_price_cents,
                   image_url, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("product", id))
    }

    /// Creates or replaces a product.
    ///
    /// `id = None` generates a fresh UUID (create); a known id overwrites
    /// that row in place and an unknown id inserts it as given, so imports
    /// can carry their own identifiers.
    pub async fn upsert(&self, id: Option<String>, input: ProductInput) -> DbResult<Product> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, color, stock, cost_cents,
                                  sale_price_cents, image_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                color = excluded.color,
                stock = excluded.stock,
                cost_cents = excluded.cost_cents,
                sale_price_cents = excluded.sale_price_cents,
                image_url = excluded.image_url
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.color)
        .bind(input.stock)
        .bind(input.cost_cents)
        .bind(input.sale_price_cents)
        .bind(&input.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(product_id = %id, name = %input.name, "product upserted");
        self.get(&id).await
    }

    /// Deletes a product by ID.
    ///
    /// Deleting an id that does not exist is a success: the caller wanted
    /// the row gone and it is gone. Existing order lines keep their product
    /// snapshot; their `product_id` reference becomes NULL.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(product_id = %id, "delete of absent product, no-op");
        } else {
            info!(product_id = %id, "product deleted");
        }

        Ok(())
    }

    /// Number of products in the catalogue.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
