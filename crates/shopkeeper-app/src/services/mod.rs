//! # Services
//!
//! The operations the shop performs, one module each:
//!
//! - [`auth`] - login against the stored users document
//! - [`checkout`] - cart to persisted order, in one transaction
//! - [`spreadsheet`] - CSV import/export for products and clients
//! - [`receipt`] - plain-text receipt rendering

pub mod auth;
pub mod checkout;
pub mod receipt;
pub mod spreadsheet;
