//! Account store consumed by the authentication core.
//!
//! The store is a trait so the login protocol and session guard can be
//! exercised against in-memory implementations in tests, and so the core
//! never depends on a concrete persistence engine.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::account::{Account, AccountId};
use crate::auth::AuthResult;

/// Read-only account lookup collaborator.
///
/// Both lookups are side-effect free. The authentication core blocks on
/// them per request and shares no mutable state between concurrent
/// callers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve an account by its login identifier.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>>;

    /// Resolve an account by its numeric ID.
    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>>;
}

const ACCOUNT_COLUMNS: &str = "id, username, email, phone_number, first_name, last_name, \
     password_hash, role, status, email_verified, login_attempts, created_at, updated_at";

/// Default PostgreSQL implementation of [`CredentialStore`]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgAccountRepository {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok(Account::from_row(&r)?)).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok(Account::from_row(&r)?)).transpose()
    }
}
