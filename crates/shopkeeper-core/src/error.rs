//! # Error Types
//!
//! Domain-specific error types for shopkeeper-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopkeeper-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopkeeper-db errors (separate crate)                                 │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  shopkeeper-app errors                                                 │
//! │  └── ApiError         - What the caller sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┬─→ ApiError → Caller              │
//! │        DbError ─────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Stock Shortage
// =============================================================================

/// One offending cart line in an insufficient-stock rejection.
///
/// A submission fails as a whole: every shortage is reported at once so the
/// operator can fix the cart in a single pass. A product that no longer
/// exists is reported with `available == 0` and `missing == true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortage {
    /// Product id as referenced by the cart line.
    pub product_id: String,
    /// Product name snapshot from the cart (the row may be gone).
    pub product_name: String,
    /// Quantity the cart asked for.
    pub requested: i64,
    /// Stock on hand at validation time.
    pub available: i64,
    /// True when the product row no longer exists.
    pub missing: bool,
}

impl std::fmt::Display for StockShortage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.missing {
            write!(f, "{} no longer exists", self.product_name)
        } else {
            write!(
                f,
                "{}: available {}, requested {}",
                self.product_name, self.available, self.requested
            )
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-friendly messages; none of them is retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete a submission.
    ///
    /// ## When This Occurs
    /// - Any cart line requests more than the product's current stock
    /// - Any cart line references a product that was deleted
    ///
    /// The whole submission is rejected; nothing is persisted.
    #[error("insufficient stock: {}", format_shortages(.0))]
    InsufficientStock(Vec<StockShortage>),

    /// Discount is larger than the cart subtotal.
    ///
    /// Checked before any persistence call is made.
    #[error("discount {discount_cents} exceeds subtotal {subtotal_cents}")]
    DiscountExceedsSubtotal {
        discount_cents: i64,
        subtotal_cents: i64,
    },

    /// Order submission attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Order submission attempted without a selected client.
    #[error("no client selected")]
    NoClientSelected,

    /// Credential check failed.
    ///
    /// Deliberately generic: "user not found" and "wrong password" are not
    /// distinguished, so usernames cannot be enumerated.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Cart has exceeded maximum allowed lines.
    #[error("cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Product is not in the cart.
    #[error("product {0} not in cart")]
    NotInCart(String),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Joins shortage lines into one human-readable message.
pub fn format_shortages(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs; surfaced inline,
/// user-correctable, never logged remotely.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed phone number, malformed number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Sale price below cost - rejected at data entry only.
    #[error("sale price {sale_price_cents} is below cost {cost_cents}")]
    PriceBelowCost {
        sale_price_cents: i64,
        cost_cents: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_lists_every_line() {
        let err = CoreError::InsufficientStock(vec![
            StockShortage {
                product_id: "p1".to_string(),
                product_name: "Blue Shirt".to_string(),
                requested: 5,
                available: 3,
                missing: false,
            },
            StockShortage {
                product_id: "p2".to_string(),
                product_name: "Red Cap".to_string(),
                requested: 1,
                available: 0,
                missing: true,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Blue Shirt: available 3, requested 5"));
        assert!(msg.contains("Red Cap no longer exists"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::PriceBelowCost {
            sale_price_cents: 500,
            cost_cents: 800,
        };
        assert_eq!(err.to_string(), "sale price 500 is below cost 800");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        // The message must not hint whether the username or password failed.
        assert_eq!(CoreError::InvalidCredentials.to_string(), "invalid credentials");
    }
}
