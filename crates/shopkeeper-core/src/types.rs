//! # Domain Types
//!
//! Core domain types used throughout Shopkeeper.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Client      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name + color   │   │  document_id    │   │  kind, sequence │       │
//! │  │  stock          │   │  phone, address │   │  client snapshot│       │
//! │  │  cost/sale ¢    │   │                 │   │  totals         │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1:N            │
//! │                                              ┌────────▼────────┐       │
//! │                                              │    OrderItem    │       │
//! │                                              │  product snap,  │       │
//! │                                              │  qty × price    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Orders copy client and product attributes at creation time so later edits
//! to the source records never retroactively alter historical orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Order Kind
// =============================================================================

/// Discriminates an immediate point-of-sale transaction from a deferred
/// sales order.
///
/// Only `Sale` moves inventory at submission time; a `SalesOrder` records
/// the commitment and is fulfilled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum OrderKind {
    /// Immediate sale: stock is decremented at submission.
    Sale,
    /// Deferred order: stock is validated but not decremented.
    SalesOrder,
}

impl OrderKind {
    /// Wire/storage name of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Sale => "sale",
            OrderKind::SalesOrder => "sales-order",
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Role
// =============================================================================

/// User role recorded on every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shop administrator: full access, single account.
    Admin,
    /// Operator: day-to-day sales capture, multiple accounts.
    Operator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Operator => f.write_str("operator"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the shop's inventory.
///
/// `stock >= 0` holds at all times: the schema carries a CHECK constraint
/// and every decrement is guarded. `sale_price >= cost` is enforced only at
/// data entry, not as a standing invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalogue and on receipts.
    pub name: String,

    /// Variant discriminator (two shirts of different colors are two rows).
    pub color: String,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Acquisition cost in cents.
    pub cost_cents: i64,

    /// Sale price in cents.
    pub sale_price_cents: i64,

    /// Optional image reference.
    pub image_url: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn sale_price(&self) -> crate::Money {
        crate::Money::from_cents(self.sale_price_cents)
    }

    /// Checks whether `quantity` units can currently be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Input shape for creating or updating a product.
///
/// The id is passed separately to the repository (`None` means "generate").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub color: String,
    pub stock: i64,
    pub cost_cents: i64,
    pub sale_price_cents: i64,
    pub image_url: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// A client in the shop's registry.
///
/// `document_id` carries the national/tax document; no uniqueness is
/// enforced on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    pub document_id: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Input shape for creating or updating a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub document_id: String,
    pub phone: String,
    pub address: String,
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order (immediate sale or deferred sales order).
///
/// Immutable after creation except for deletion. Client fields are
/// snapshots copied at creation, never live-joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub kind: OrderKind,

    /// Per-kind monotonic ticket number, assigned by the storage backend
    /// inside the submission transaction.
    pub sequence: i64,

    /// Opaque payment method label ("cash", "card", ...).
    pub payment_method: String,

    /// Username snapshot of who captured the order.
    pub performed_by_name: String,
    /// Role snapshot of who captured the order.
    pub performed_by_role: Role,

    // Client snapshot fields
    pub client_id: String,
    pub client_name: String,
    pub client_document_id: String,
    pub client_phone: String,

    /// Delivery address for deferred orders.
    pub delivery_address: Option<String>,

    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Ticket label as printed on receipts, e.g. `V-000042` / `P-000007`.
    pub fn ticket_label(&self) -> String {
        let prefix = match self.kind {
            OrderKind::Sale => "V",
            OrderKind::SalesOrder => "P",
        };
        format!("{}-{:06}", prefix, self.sequence)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses snapshot pattern to freeze product data at time of submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,

    /// Nullable: the product may be deleted after the order exists.
    pub product_id: Option<String>,

    /// Product name at time of submission (frozen).
    pub product_name: String,
    /// Variant color at time of submission (frozen).
    pub product_color: String,

    pub qty: i64,
    pub unit_price_cents: i64,
    /// Always `qty × unit_price_cents`.
    pub subtotal_cents: i64,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Draft
// =============================================================================

/// A fully validated order ready to be submitted in one transaction.
///
/// Built by the checkout flow from the cart, the selected client and the
/// request parameters. The repository assigns id, sequence and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub kind: OrderKind,
    pub payment_method: String,
    pub performed_by_name: String,
    pub performed_by_role: Role,

    pub client_id: String,
    pub client_name: String,
    pub client_document_id: String,
    pub client_phone: String,

    pub delivery_address: Option<String>,

    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,

    pub notes: Option<String>,

    pub lines: Vec<DraftLine>,
}

/// One line of an order draft (product snapshot + quantity).
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub product_id: String,
    pub product_name: String,
    pub product_color: String,
    pub qty: i64,
    pub unit_price_cents: i64,
}

impl DraftLine {
    /// Line subtotal in cents.
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.qty
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
