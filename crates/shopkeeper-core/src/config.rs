//! # Ticket Configuration
//!
//! The `tickets` configuration document: the shop identity printed on every
//! receipt. Stored whole under a fixed key; read in full, written in full.
//!
//! The per-kind next-ticket counters are NOT part of this document. They
//! live in the `ticket_counters` table and are advanced atomically inside
//! the order submission transaction, which removes the duplicate-number
//! race a read-modify-write on this document would have.

use serde::{Deserialize, Serialize};

/// The `tickets` configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsConfig {
    /// Shop name, first line of every receipt.
    pub company_name: String,

    /// Second header line (slogan, address, tax id - free text).
    pub subtitle: String,

    /// Closing line of every receipt.
    pub farewell_message: String,
}

impl Default for TicketsConfig {
    /// Defaults supplied when the document is absent from the backend.
    fn default() -> Self {
        TicketsConfig {
            company_name: "Shopkeeper".to_string(),
            subtitle: String::new(),
            farewell_message: "Thank you for your purchase!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrips_as_json() {
        let config = TicketsConfig {
            company_name: "La Tiendita".to_string(),
            subtitle: "Av. Siempre Viva 742".to_string(),
            farewell_message: "¡Gracias por su compra!".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: TicketsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_default_has_farewell() {
        assert!(!TicketsConfig::default().farewell_message.is_empty());
    }
}
