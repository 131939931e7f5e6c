//! # Order Repository
//!
//! Persistence for captured orders, including the submission transaction.
//!
//! ## Submission Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(draft)                            ONE SQLite transaction        │
//! │                                                                         │
//! │  1. Check stock for EVERY line (both kinds)                            │
//! │     └── any shortage → rollback, report all offending lines at once    │
//! │  2. Claim the ticket number:                                           │
//! │     UPDATE ticket_counters ... RETURNING next_number - 1               │
//! │  3. Insert the order header (snapshots + totals)                       │
//! │  4. Insert every order line                                            │
//! │  5. Sale only: guarded decrement per line                              │
//! │     UPDATE products SET stock = stock - qty WHERE id = ? AND stock>=qty│
//! │     └── 0 rows touched → concurrent shopper won → rollback             │
//! │  6. Commit                                                             │
//! │                                                                         │
//! │  Either everything lands or nothing does: no half-written orders,      │
//! │  no ticket number gaps from failed submissions, no oversold stock.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use shopkeeper_core::{Order, OrderDraft, OrderItem, OrderKind, StockShortage};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Submits a draft as one atomic transaction.
    ///
    /// Assigns the order id, the per-kind ticket sequence and the creation
    /// timestamp; the caller gets back the persisted header.
    pub async fn create(&self, draft: &OrderDraft) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        // Step 1: stock check across every line, collecting all shortages.
        let mut shortages: Vec<StockShortage> = Vec::new();
        for line in &draft.lines {
            let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                .bind(&line.product_id)
                .fetch_optional(&mut *tx)
                .await?;

            match stock {
                None => shortages.push(StockShortage {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    requested: line.qty,
                    available: 0,
                    missing: true,
                }),
                Some(available) if available < line.qty => shortages.push(StockShortage {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    requested: line.qty,
                    available,
                    missing: false,
                }),
                Some(_) => {}
            }
        }

        if !shortages.is_empty() {
            warn!(
                kind = %draft.kind,
                lines = shortages.len(),
                "order rejected for insufficient stock"
            );
            return Err(DbError::InsufficientStock(shortages));
        }

        // Step 2: claim the ticket number. The row update serializes
        // concurrent submissions of the same kind.
        let sequence: i64 = sqlx::query_scalar(
            r#"
            UPDATE ticket_counters
            SET next_number = next_number + 1
            WHERE kind = ?1
            RETURNING next_number - 1
            "#,
        )
        .bind(draft.kind)
        .fetch_one(&mut *tx)
        .await?;

        // Step 3: order header.
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO orders (id, kind, sequence, payment_method,
                                performed_by_name, performed_by_role,
                                client_id, client_name, client_document_id,
                                client_phone, delivery_address,
                                subtotal_cents, discount_cents, total_cents,
                                notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&order_id)
        .bind(draft.kind)
        .bind(sequence)
        .bind(&draft.payment_method)
        .bind(&draft.performed_by_name)
        .bind(draft.performed_by_role)
        .bind(&draft.client_id)
        .bind(&draft.client_name)
        .bind(&draft.client_document_id)
        .bind(&draft.client_phone)
        .bind(&draft.delivery_address)
        .bind(draft.subtotal_cents)
        .bind(draft.discount_cents)
        .bind(draft.total_cents)
        .bind(&draft.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // Step 4: order lines.
        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name,
                                         product_color, qty, unit_price_cents,
                                         subtotal_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(&line.product_color)
            .bind(line.qty)
            .bind(line.unit_price_cents)
            .bind(line.subtotal_cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        // Step 5: immediate sales move inventory; deferred orders do not.
        // The `stock >= qty` guard makes the decrement conditional: zero
        // rows touched means another submission took the stock between our
        // check and now, and the whole transaction rolls back.
        if draft.kind == OrderKind::Sale {
            for line in &draft.lines {
                let result = sqlx::query(
                    r#"
                    UPDATE products
                    SET stock = stock - ?2
                    WHERE id = ?1 AND stock >= ?2
                    "#,
                )
                .bind(&line.product_id)
                .bind(line.qty)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    let available: i64 =
                        sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                            .bind(&line.product_id)
                            .fetch_optional(&mut *tx)
                            .await?
                            .unwrap_or(0);

                    warn!(
                        product_id = %line.product_id,
                        requested = line.qty,
                        available,
                        "stock taken by concurrent sale, rolling back"
                    );
                    return Err(DbError::InsufficientStock(vec![StockShortage {
                        product_id: line.product_id.clone(),
                        product_name: line.product_name.clone(),
                        requested: line.qty,
                        available,
                        missing: false,
                    }]));
                }
            }
        }

        tx.commit().await?;

        info!(
            order_id = %order_id,
            kind = %draft.kind,
            sequence,
            total_cents = draft.total_cents,
            "order created"
        );

        Ok(Order {
            id: order_id,
            kind: draft.kind,
            sequence,
            payment_method: draft.payment_method.clone(),
            performed_by_name: draft.performed_by_name.clone(),
            performed_by_role: draft.performed_by_role,
            client_id: draft.client_id.clone(),
            client_name: draft.client_name.clone(),
            client_document_id: draft.client_document_id.clone(),
            client_phone: draft.client_phone.clone(),
            delivery_address: draft.delivery_address.clone(),
            subtotal_cents: draft.subtotal_cents,
            discount_cents: draft.discount_cents,
            total_cents: draft.total_cents,
            notes: draft.notes.clone(),
            created_at: now,
        })
    }

    /// Lists all orders, newest first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, kind, sequence, payment_method, performed_by_name,
                   performed_by_role, client_id, client_name,
                   client_document_id, client_phone, delivery_address,
                   subtotal_cents, discount_cents, total_cents, notes,
                   created_at
            FROM orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders of one kind, newest first.
    pub async fn list_by_kind(&self, kind: OrderKind) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, kind, sequence, payment_method, performed_by_name,
                   performed_by_role, client_id, client_name,
                   client_document_id, client_phone, delivery_address,
                   subtotal_cents, discount_cents, total_cents, notes,
                   created_at
            FROM orders
            WHERE kind = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Fetches one order header by ID.
    pub async fn get(&self, id: &str) -> DbResult<Order> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT id, kind, sequence, payment_method, performed_by_name,
                   performed_by_role, client_id, client_name,
                   client_document_id, client_phone, delivery_address,
                   subtotal_cents, discount_cents, total_cents, notes,
                   created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("order", id))
    }

    /// Fetches the lines of an order, in insertion order.
    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, product_name, product_color,
                   qty, unit_price_cents, subtotal_cents, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Deletes an order and (via cascade) its lines.
    ///
    /// Stock is NOT restored: the goods left the shop; a correction is a
    /// manual stock adjustment, not a side effect of deletion. Absent id is
    /// a no-op success.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(order_id = %id, "delete of absent order, no-op");
        } else {
            info!(order_id = %id, "order deleted");
        }

        Ok(())
    }

    /// Wipes the whole order history (admin "clear records" action).
    ///
    /// Counters are left alone so ticket numbers stay unique across the
    /// wipe. Returns the number of orders removed.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM orders").execute(&self.pool).await?;

        info!(removed = result.rows_affected(), "order history cleared");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shopkeeper_core::{DraftLine, ProductInput, Role};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, stock: i64, price_cents: i64) -> String {
        db.products()
            .upsert(
                None,
                ProductInput {
                    name: name.to_string(),
                    color: "blue".to_string(),
                    stock,
                    cost_cents: price_cents / 2,
                    sale_price_cents: price_cents,
                    image_url: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn draft(kind: OrderKind, lines: Vec<DraftLine>) -> OrderDraft {
        let subtotal: i64 = lines.iter().map(|l| l.subtotal_cents()).sum();
        OrderDraft {
            kind,
            payment_method: "cash".to_string(),
            performed_by_name: "ana".to_string(),
            performed_by_role: Role::Operator,
            client_id: "c1".to_string(),
            client_name: "Maria Lopez".to_string(),
            client_document_id: "1090123456".to_string(),
            client_phone: "300 555 0199".to_string(),
            delivery_address: None,
            subtotal_cents: subtotal,
            discount_cents: 0,
            total_cents: subtotal,
            notes: None,
            lines,
        }
    }

    fn line(product_id: &str, qty: i64, unit_price_cents: i64) -> DraftLine {
        DraftLine {
            product_id: product_id.to_string(),
            product_name: "Shirt".to_string(),
            product_color: "blue".to_string(),
            qty,
            unit_price_cents,
        }
    }

    #[tokio::test]
    async fn test_sale_decrements_stock() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 10, 900).await;

        let order = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 3, 900)]))
            .await
            .unwrap();

        assert_eq!(order.sequence, 1);
        assert_eq!(order.ticket_label(), "V-000001");
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 7);

        let items = db.orders().items(&order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subtotal_cents, 2700);
    }

    #[tokio::test]
    async fn test_sales_order_validates_but_keeps_stock() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 10, 900).await;

        db.orders()
            .create(&draft(OrderKind::SalesOrder, vec![line(&product_id, 3, 900)]))
            .await
            .unwrap();

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_shortage_rolls_back_everything() {
        let db = test_db().await;
        let plenty = seed_product(&db, "Shirt", 10, 900).await;
        let scarce = seed_product(&db, "Cap", 1, 500).await;

        let err = db
            .orders()
            .create(&draft(
                OrderKind::Sale,
                vec![line(&plenty, 2, 900), line(&scarce, 5, 500)],
            ))
            .await
            .unwrap_err();

        match err {
            DbError::InsufficientStock(shortages) => {
                assert_eq!(shortages.len(), 1);
                assert_eq!(shortages[0].requested, 5);
                assert_eq!(shortages[0].available, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Nothing persisted, nothing decremented, no ticket number burned.
        assert!(db.orders().list().await.unwrap().is_empty());
        assert_eq!(db.products().get(&plenty).await.unwrap().stock, 10);
        let next = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&plenty, 1, 900)]))
            .await
            .unwrap();
        assert_eq!(next.sequence, 1);
    }

    #[tokio::test]
    async fn test_missing_product_reported_as_shortage() {
        let db = test_db().await;

        let err = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line("ghost", 1, 900)]))
            .await
            .unwrap_err();

        match err {
            DbError::InsufficientStock(shortages) => {
                assert!(shortages[0].missing);
                assert_eq!(shortages[0].available, 0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sequences_are_per_kind_and_increasing() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 100, 900).await;

        let s1 = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();
        let p1 = db
            .orders()
            .create(&draft(OrderKind::SalesOrder, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();
        let s2 = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();

        assert_eq!((s1.sequence, s2.sequence), (1, 2));
        assert_eq!(p1.sequence, 1);
        assert_eq!(p1.ticket_label(), "P-000001");
    }

    #[tokio::test]
    async fn test_delete_cascades_items_and_keeps_stock() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 10, 900).await;

        let order = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 3, 900)]))
            .await
            .unwrap();

        db.orders().delete(&order.id).await.unwrap();
        db.orders().delete(&order.id).await.unwrap(); // idempotent

        assert!(db.orders().items(&order.id).await.unwrap().is_empty());
        // Deleting the record does not put goods back on the shelf.
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 7);
    }

    #[tokio::test]
    async fn test_deleting_product_nulls_item_reference() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 10, 900).await;

        let order = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 2, 900)]))
            .await
            .unwrap();

        db.products().delete(&product_id).await.unwrap();

        let items = db.orders().items(&order.id).await.unwrap();
        assert_eq!(items[0].product_id, None);
        assert_eq!(items[0].product_name, "Shirt"); // snapshot survives
    }

    #[tokio::test]
    async fn test_delete_all_keeps_counters() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 100, 900).await;

        db.orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();
        db.orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();

        assert_eq!(db.orders().delete_all().await.unwrap(), 2);
        assert!(db.orders().list().await.unwrap().is_empty());

        // Numbering continues: tickets stay unique across the wipe.
        let next = db
            .orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();
        assert_eq!(next.sequence, 3);
    }

    #[tokio::test]
    async fn test_list_by_kind() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Shirt", 100, 900).await;

        db.orders()
            .create(&draft(OrderKind::Sale, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();
        db.orders()
            .create(&draft(OrderKind::SalesOrder, vec![line(&product_id, 1, 900)]))
            .await
            .unwrap();

        let sales = db.orders().list_by_kind(OrderKind::Sale).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].kind, OrderKind::Sale);
    }
}
