//! # Checkout Service
//!
//! Turns the current cart into a persisted order.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_order(db, cart, identity, request)                              │
//! │                                                                         │
//! │  1. Snapshot the cart under the lock (lines + subtotal)                │
//! │     └── empty cart → CartError, nothing touched                        │
//! │  2. Apply the discount                                                 │
//! │     └── discount > subtotal → rejected HERE, before any persistence    │
//! │  3. Load the client and snapshot its fields onto the draft             │
//! │  4. OrderRepository::create - ONE transaction                          │
//! │     (stock check, ticket number, header, lines, decrement)             │
//! │  5. Success → clear the cart                                           │
//! │     Failure → cart kept intact so the operator can fix and retry       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use shopkeeper_core::{CoreError, Identity, Order, OrderDraft, OrderKind};
use shopkeeper_db::Database;
use tracing::info;

use crate::error::ApiResult;
use crate::state::CartState;

/// Parameters of an order submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Immediate sale or deferred sales order.
    pub kind: OrderKind,

    /// Selected client (required; walk-ins get a registry entry too).
    pub client_id: String,

    /// Opaque payment method label ("cash", "card", ...).
    pub payment_method: String,

    /// Whole-order discount in cents.
    #[serde(default)]
    pub discount_cents: i64,

    /// Delivery address for deferred orders.
    #[serde(default)]
    pub delivery_address: Option<String>,

    /// Free-form note printed on the receipt.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Submits the current cart as an order.
///
/// The cart is cleared only after the transaction commits; any rejection
/// (shortage, bad discount, missing client) leaves it untouched.
pub async fn submit_order(
    db: &Database,
    cart: &CartState,
    identity: &Identity,
    request: CheckoutRequest,
) -> ApiResult<Order> {
    // Snapshot lines and totals; the lock is not held across awaits.
    let (lines, subtotal_cents, total_cents) = cart.with_cart(|c| {
        if c.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let total = c.total_cents(request.discount_cents)?;
        Ok((c.draft_lines(), c.subtotal_cents(), total))
    })?;

    if request.client_id.trim().is_empty() {
        return Err(CoreError::NoClientSelected.into());
    }
    let client = db.clients().get(&request.client_id).await?;

    let draft = OrderDraft {
        kind: request.kind,
        payment_method: request.payment_method,
        performed_by_name: identity.username.clone(),
        performed_by_role: identity.role,
        client_id: client.id,
        client_name: client.name,
        client_document_id: client.document_id,
        client_phone: client.phone,
        delivery_address: request.delivery_address,
        subtotal_cents,
        discount_cents: request.discount_cents,
        total_cents,
        notes: request.notes,
        lines,
    };

    let order = db.orders().create(&draft).await?;

    cart.with_cart_mut(|c| c.clear());
    info!(
        order_id = %order.id,
        ticket = %order.ticket_label(),
        "checkout complete, cart cleared"
    );

    Ok(order)
}

// =============================================================================
// Unit Tests
// =============================================================================
