//! # Cart
//!
//! The pure shopping cart: lines, merge semantics, subtotal and discount
//! math. The app layer wraps this in a mutex for concurrent command access;
//! nothing in here does I/O.
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product again
//!   increases the quantity)
//! - Quantity is always > 0 (updating to 0 removes the line)
//! - Maximum lines: [`crate::MAX_CART_LINES`]
//! - Maximum quantity per line: [`crate::MAX_LINE_QTY`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DraftLine, Product};
use crate::{MAX_CART_LINES, MAX_LINE_QTY};

// =============================================================================
// Cart Line
// =============================================================================

/// An item in the cart.
///
/// ## Price Freezing
/// Name, color and unit price are captured when the product is added. If
/// the product row changes afterwards, the cart keeps displaying what the
/// operator agreed to; the submitted order snapshots the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID), used for the stock check at submission.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Variant color at time of adding (frozen).
    pub color: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart.
    pub qty: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a cart line from a product and quantity.
    pub fn from_product(product: &Product, qty: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            color: product.color.clone(),
            unit_price_cents: product.sale_price_cents,
            qty,
            added_at: Utc::now(),
        }
    }

    /// Line subtotal (unit price × quantity) in cents.
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.qty
    }
}

impl From<&CartLine> for DraftLine {
    fn from(line: &CartLine) -> Self {
        DraftLine {
            product_id: line.product_id.clone(),
            product_name: line.name.clone(),
            product_color: line.color.clone(),
            qty: line.qty,
            unit_price_cents: line.unit_price_cents,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart for one in-progress order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in the cart.
    pub lines: Vec<CartLine>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    pub fn add_line(&mut self, product: &Product, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            return Err(crate::ValidationError::MustBePositive {
                field: "qty".to_string(),
            }
            .into());
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.qty + qty;
            if new_qty > MAX_LINE_QTY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QTY,
                });
            }
            line.qty = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        if qty > MAX_LINE_QTY {
            return Err(CoreError::QuantityTooLarge {
                requested: qty,
                max: MAX_LINE_QTY,
            });
        }

        self.lines.push(CartLine::from_product(product, qty));
        Ok(())
    }

    /// Updates the quantity of a line; 0 removes it.
    pub fn update_qty(&mut self, product_id: &str, qty: i64) -> CoreResult<()> {
        if qty == 0 {
            return self.remove_line(product_id);
        }

        if qty < 0 {
            return Err(crate::ValidationError::MustBePositive {
                field: "qty".to_string(),
            }
            .into());
        }

        if qty > MAX_LINE_QTY {
            return Err(CoreError::QuantityTooLarge {
                requested: qty,
                max: MAX_LINE_QTY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.qty = qty;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_id.to_string())),
        }
    }

    /// Removes a line from the cart by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_qty(&self) -> i64 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    /// Subtotal before discount, in cents.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.subtotal_cents()).sum()
    }

    /// Total after discount, in cents.
    ///
    /// Fails with [`CoreError::DiscountExceedsSubtotal`] rather than
    /// producing a negative total; the checkout flow calls this before any
    /// persistence happens.
    pub fn total_cents(&self, discount_cents: i64) -> CoreResult<i64> {
        if discount_cents < 0 {
            return Err(crate::ValidationError::MustNotBeNegative {
                field: "discount".to_string(),
            }
            .into());
        }

        let subtotal = self.subtotal_cents();
        if discount_cents > subtotal {
            return Err(CoreError::DiscountExceedsSubtotal {
                discount_cents,
                subtotal_cents: subtotal,
            });
        }

        Ok(subtotal - discount_cents)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Draft lines for order submission.
    pub fn draft_lines(&self) -> Vec<DraftLine> {
        self.lines.iter().map(DraftLine::from).collect()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            color: "blue".to_string(),
            stock: 50,
            cost_cents: price_cents / 2,
            sale_price_cents: price_cents,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_add_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_qty(), 2);
        assert_eq!(cart.subtotal_cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_product_increases_qty() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_line(&product, 2).unwrap();
        cart.add_line(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1); // Still one distinct line
        assert_eq!(cart.total_qty(), 5);
    }

    #[test]
    fn test_cart_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 1000);

        cart.add_line(&product, 1).unwrap();
        product.sale_price_cents = 9999;

        assert_eq!(cart.subtotal_cents(), 1000);
    }

    #[test]
    fn test_cart_update_qty_zero_removes() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_line(&product, 2).unwrap();
        cart.update_qty("1", 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_remove_unknown_line_fails() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.remove_line("missing"),
            Err(CoreError::NotInCart(_))
        ));
    }

    #[test]
    fn test_cart_qty_cap() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        assert!(matches!(
            cart.add_line(&product, MAX_LINE_QTY + 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_total_with_discount() {
        let mut cart = Cart::new();
        let product = test_product("1", 100);
        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.total_cents(50).unwrap(), 150);
        assert_eq!(cart.total_cents(0).unwrap(), 200);
    }

    #[test]
    fn test_discount_exceeding_subtotal_rejected() {
        let mut cart = Cart::new();
        let product = test_product("1", 100);
        cart.add_line(&product, 2).unwrap();

        assert!(matches!(
            cart.total_cents(201),
            Err(CoreError::DiscountExceedsSubtotal { .. })
        ));
    }

    #[test]
    fn test_negative_discount_rejected() {
        let cart = Cart::new();
        assert!(cart.total_cents(-1).is_err());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_line(&product, 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }
}
