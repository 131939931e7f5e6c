//! # Auth Service
//!
//! Login and user administration over the stored users document. The
//! credential comparison itself is pure and lives in shopkeeper-core; this
//! module only loads and stores the document.

use shopkeeper_core::auth::OperatorCredential;
use shopkeeper_core::{Identity, Role, UsersConfig};
use shopkeeper_db::Database;
use tracing::info;

use crate::error::ApiResult;

/// Checks a credential claim for the given role.
///
/// Loads the users document (defaults on first run: `admin`/`admin`) and
/// runs the pure check. Failures are a single generic error.
pub async fn login(db: &Database, role: Role, username: &str, password: &str) -> ApiResult<Identity> {
    let users = db.settings().users().await?;
    let identity = shopkeeper_core::authenticate(&users, role, username, password)?;

    info!(username = %identity.username, role = %identity.role, "login succeeded");
    Ok(identity)
}

/// Replaces the whole users document (admin screen "save").
pub async fn save_users(db: &Database, users: &UsersConfig) -> ApiResult<()> {
    db.settings().set_users(users).await?;
    Ok(())
}

/// Adds or replaces one operator by username (case-insensitive).
pub async fn upsert_operator(db: &Database, operator: OperatorCredential) -> ApiResult<()> {
    let mut users = db.settings().users().await?;

    let needle = operator.username.to_lowercase();
    users
        .operators
        .retain(|op| op.username.to_lowercase() != needle);
    users.operators.push(operator);

    db.settings().set_users(&users).await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use shopkeeper_db::DbConfig;

    #[tokio::test]
    async fn test_default_admin_can_log_in() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let identity = login(&db, Role::Admin, "admin", "admin").await.unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_operator_lifecycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        upsert_operator(
            &db,
            OperatorCredential {
                username: "ana".to_string(),
                password: "ana-pass".to_string(),
                active: true,
            },
        )
        .await
        .unwrap();

        assert!(login(&db, Role::Operator, "ANA", "ana-pass").await.is_ok());

        // Deactivate: row stays, login stops working.
        upsert_operator(
            &db,
            OperatorCredential {
                username: "Ana".to_string(),
                password: "ana-pass".to_string(),
                active: false,
            },
        )
        .await
        .unwrap();

        let err = login(&db, Role::Operator, "ana", "ana-pass")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let users = db.settings().users().await.unwrap();
        assert_eq!(users.operators.len(), 1);
    }
}
