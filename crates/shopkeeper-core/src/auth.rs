//! # Authentication
//!
//! The `users` configuration document and the pure credential check.
//!
//! ## How Login Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Login(role, username, password)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Load `users` document (settings repository, defaults if absent)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  authenticate() ← THIS MODULE (pure)                                   │
//! │       │                                                                 │
//! │       ├── role == Admin    → compare against the single admin record   │
//! │       ├── role == Operator → compare against operators with            │
//! │       │                      active == true                            │
//! │       │                                                                 │
//! │       ├── username: case-insensitive  password: exact                  │
//! │       │                                                                 │
//! │       └── any mismatch → InvalidCredentials (one generic failure:      │
//! │           "user not found" and "wrong password" are indistinguishable, │
//! │           so usernames cannot be enumerated)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Role;

// =============================================================================
// Users Document
// =============================================================================

/// Admin credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

/// Operator credential record.
///
/// Inactive operators keep their row (history references their username)
/// but can no longer log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCredential {
    pub username: String,
    pub password: String,
    pub active: bool,
}

/// The `users` configuration document, stored whole under a fixed key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersConfig {
    pub admin: AdminCredential,
    #[serde(default)]
    pub operators: Vec<OperatorCredential>,
}

impl Default for UsersConfig {
    /// Defaults supplied when the document is absent from the backend.
    ///
    /// First run of a fresh shop: one admin account, no operators.
    fn default() -> Self {
        UsersConfig {
            admin: AdminCredential {
                username: "admin".to_string(),
                password: "admin".to_string(),
            },
            operators: Vec::new(),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// An authenticated identity, snapshotted onto every order it captures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

// =============================================================================
// Credential Check
// =============================================================================

/// Checks a credential claim against the users document.
///
/// Username comparison is case-insensitive; password comparison is exact.
/// Every failure is the same generic [`CoreError::InvalidCredentials`].
pub fn authenticate(
    users: &UsersConfig,
    role: Role,
    username: &str,
    password: &str,
) -> CoreResult<Identity> {
    let claimed = username.trim();

    let matched = match role {
        Role::Admin => {
            username_eq(&users.admin.username, claimed) && users.admin.password == password
        }
        Role::Operator => users
            .operators
            .iter()
            .filter(|op| op.active)
            .any(|op| username_eq(&op.username, claimed) && op.password == password),
    };

    if matched {
        Ok(Identity {
            username: claimed.to_string(),
            role,
        })
    } else {
        Err(CoreError::InvalidCredentials)
    }
}

/// Case-insensitive username comparison.
fn username_eq(stored: &str, claimed: &str) -> bool {
    stored.to_lowercase() == claimed.to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_users() -> UsersConfig {
        UsersConfig {
            admin: AdminCredential {
                username: "Admin".to_string(),
                password: "s3cret".to_string(),
            },
            operators: vec![
                OperatorCredential {
                    username: "ana".to_string(),
                    password: "ana-pass".to_string(),
                    active: true,
                },
                OperatorCredential {
                    username: "bruno".to_string(),
                    password: "bruno-pass".to_string(),
                    active: false,
                },
            ],
        }
    }

    #[test]
    fn test_admin_login_case_insensitive_username() {
        let users = test_users();
        let identity = authenticate(&users, Role::Admin, "ADMIN", "s3cret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.username, "ADMIN");
    }

    #[test]
    fn test_password_is_case_sensitive() {
        let users = test_users();
        assert!(matches!(
            authenticate(&users, Role::Admin, "admin", "S3CRET"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_operator_login() {
        let users = test_users();
        let identity = authenticate(&users, Role::Operator, "Ana", "ana-pass").unwrap();
        assert_eq!(identity.role, Role::Operator);
    }

    #[test]
    fn test_inactive_operator_rejected() {
        let users = test_users();
        assert!(matches!(
            authenticate(&users, Role::Operator, "bruno", "bruno-pass"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let users = test_users();
        let unknown = authenticate(&users, Role::Operator, "nobody", "x").unwrap_err();
        let wrong = authenticate(&users, Role::Operator, "ana", "x").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_operator_cannot_use_admin_claim() {
        let users = test_users();
        assert!(authenticate(&users, Role::Admin, "ana", "ana-pass").is_err());
    }

    #[test]
    fn test_default_users_document() {
        let users = UsersConfig::default();
        assert!(authenticate(&users, Role::Admin, "admin", "admin").is_ok());
        assert!(users.operators.is_empty());
    }
}
