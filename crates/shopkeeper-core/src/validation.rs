//! # Validation Module
//!
//! Input validation utilities for data entry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: App layer (this module, before any write)                    │
//! │  ├── Required fields, formats, numeric ranges                          │
//! │  └── Business-entry rules (sale price vs cost, phone format)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (stock >= 0)                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{ClientInput, ProductInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product or client).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - Digits, spaces, dots, dashes and parentheses only
/// - At least 7 digits
///
/// ## Example
/// ```rust
/// use shopkeeper_core::validation::validate_phone;
///
/// assert!(validate_phone("+57 (300) 555-0199").is_ok());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '.' | '-' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "may contain only digits, spaces, dots, dashes and parentheses".to_string(),
        });
    }

    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 7 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain at least 7 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock count.
///
/// ## Rules
/// - Must be non-negative (zero is a valid "out of stock" state)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for giveaways)
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Parses a numeric cell from user input (spreadsheet import, forms).
///
/// Accepts plain integers; a malformed value is a user-correctable
/// validation error, never a panic.
pub fn parse_i64(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a whole number", raw.trim()),
        })
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product at data entry.
///
/// ## Rules
/// - name and color required
/// - stock, cost and sale price non-negative
/// - sale price must not be below cost (entry-time rule only; later cost
///   edits do not retroactively invalidate the row)
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_name(&input.name)?;

    if input.color.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "color".to_string(),
        });
    }

    validate_stock(input.stock)?;
    validate_price_cents("cost", input.cost_cents)?;
    validate_price_cents("sale price", input.sale_price_cents)?;

    if input.sale_price_cents < input.cost_cents {
        return Err(ValidationError::PriceBelowCost {
            sale_price_cents: input.sale_price_cents,
            cost_cents: input.cost_cents,
        });
    }

    Ok(())
}

/// Validates a client at data entry.
///
/// ## Rules
/// - name and document required, phone well-formed
/// - address free-form (may be empty; walk-in clients have none)
pub fn validate_client_input(input: &ClientInput) -> ValidationResult<()> {
    validate_name(&input.name)?;

    if input.document_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "document_id".to_string(),
        });
    }

    validate_phone(&input.phone)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product_input() -> ProductInput {
        ProductInput {
            name: "Linen Shirt".to_string(),
            color: "white".to_string(),
            stock: 10,
            cost_cents: 500,
            sale_price_cents: 900,
            image_url: None,
        }
    }

    fn client_input() -> ClientInput {
        ClientInput {
            name: "Maria Lopez".to_string(),
            document_id: "1090123456".to_string(),
            phone: "+57 300 555 0199".to_string(),
            address: "Calle 10 #4-21".to_string(),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Linen Shirt").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("3005550199").is_ok());
        assert!(validate_phone("+57 (300) 555-0199").is_ok());
        assert!(validate_phone("555.0199.00").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12345").is_err()); // too few digits
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(100).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("stock", " 42 ").unwrap(), 42);
        assert!(parse_i64("stock", "4.2").is_err());
        assert!(parse_i64("stock", "plenty").is_err());
    }

    #[test]
    fn test_product_input_ok() {
        assert!(validate_product_input(&product_input()).is_ok());
    }

    #[test]
    fn test_product_price_below_cost_rejected() {
        let mut input = product_input();
        input.sale_price_cents = 400;
        assert!(matches!(
            validate_product_input(&input),
            Err(ValidationError::PriceBelowCost { .. })
        ));
    }

    #[test]
    fn test_product_missing_color_rejected() {
        let mut input = product_input();
        input.color = "  ".to_string();
        assert!(validate_product_input(&input).is_err());
    }

    #[test]
    fn test_client_input_ok() {
        assert!(validate_client_input(&client_input()).is_ok());
    }

    #[test]
    fn test_client_bad_phone_rejected() {
        let mut input = client_input();
        input.phone = "not-a-phone".to_string();
        assert!(validate_client_input(&input).is_err());
    }

    #[test]
    fn test_client_empty_address_allowed() {
        let mut input = client_input();
        input.address = String::new();
        assert!(validate_client_input(&input).is_ok());
    }
}
