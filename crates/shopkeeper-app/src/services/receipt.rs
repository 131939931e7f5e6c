//! # Receipt Service
//!
//! Plain-text receipt rendering for thermal printers.
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────────────┐
//! │           La Tiendita              │  ← company_name (centered)
//! │        Av. Siempre Viva 742        │  ← subtitle (centered)
//! │ ---------------------------------- │
//! │ V-000042          2026-08-23 14:05 │  ← ticket label + local time
//! │ Client: Maria Lopez (1090123456)   │
//! │ Served by: ana                     │
//! │ ---------------------------------- │
//! │ Linen Shirt (white)                │
//! │   2 x $29.00              $58.00   │
//! │ ---------------------------------- │
//! │ Subtotal                  $58.00   │
//! │ Discount                  -$5.00   │  ← only when non-zero
//! │ TOTAL                     $53.00   │
//! │ Paid by cash                       │
//! │ ---------------------------------- │
//! │     ¡Gracias por su compra!        │  ← farewell (centered)
//! └────────────────────────────────────┘
//! ```

use shopkeeper_core::{Money, Order, OrderItem, TicketsConfig};

/// Centers `text` within `width` columns (left-biased on odd padding).
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Right-aligns `value` after `label` within `width` columns.
fn spread(label: &str, value: &str, width: usize) -> String {
    let used = label.chars().count() + value.chars().count();
    if used >= width {
        return format!("{} {}", label, value);
    }
    format!("{}{}{}", label, " ".repeat(width - used), value)
}

/// Renders a receipt for a persisted order.
pub fn render_receipt(
    tickets: &TicketsConfig,
    order: &Order,
    items: &[OrderItem],
    width: usize,
) -> String {
    let rule = "-".repeat(width);
    let mut out = String::new();

    out.push_str(&center(&tickets.company_name, width));
    out.push('\n');
    if !tickets.subtitle.is_empty() {
        out.push_str(&center(&tickets.subtitle, width));
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&spread(
        &order.ticket_label(),
        &order.created_at.format("%Y-%m-%d %H:%M").to_string(),
        width,
    ));
    out.push('\n');
    out.push_str(&format!(
        "Client: {} ({})\n",
        order.client_name, order.client_document_id
    ));
    out.push_str(&format!("Served by: {}\n", order.performed_by_name));
    if let Some(address) = order.delivery_address.as_deref().filter(|a| !a.is_empty()) {
        out.push_str(&format!("Deliver to: {}\n", address));
    }
    out.push_str(&rule);
    out.push('\n');

    for item in items {
        out.push_str(&format!("{} ({})\n", item.product_name, item.product_color));
        out.push_str(&spread(
            &format!(
                "  {} x {}",
                item.qty,
                Money::from_cents(item.unit_price_cents)
            ),
            &Money::from_cents(item.subtotal_cents).to_string(),
            width,
        ));
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&spread(
        "Subtotal",
        &Money::from_cents(order.subtotal_cents).to_string(),
        width,
    ));
    out.push('\n');
    if order.discount_cents > 0 {
        out.push_str(&spread(
            "Discount",
            &format!("-{}", Money::from_cents(order.discount_cents)),
            width,
        ));
        out.push('\n');
    }
    out.push_str(&spread(
        "TOTAL",
        &Money::from_cents(order.total_cents).to_string(),
        width,
    ));
    out.push('\n');
    out.push_str(&format!("Paid by {}\n", order.payment_method));

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("Note: {}\n", notes));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&center(&tickets.farewell_message, width));
    out.push('\n');

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
