//! Account manager implementation.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use super::models::{Account, AccountId, AccountPatch, AccountPublic, NewAccount};
use crate::auth::PasswordHasher;
use crate::notify::{Notifier, VerificationMail};

/// Account management errors
#[derive(Debug, Error)]
pub enum AccountError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Username already exists
    #[error("username already registered")]
    UsernameTaken,

    /// Password hashing failed
    #[error("password hashing failed")]
    HashingFailed,
}

/// Result type for account operations
pub type AccountResult<T> = Result<T, AccountError>;

const ACCOUNT_COLUMNS: &str = "id, username, email, phone_number, first_name, last_name, \
     password_hash, role, status, email_verified, login_attempts, created_at, updated_at";

/// Account manager
#[derive(Clone)]
pub struct AccountManager {
    pool: Arc<PgPool>,
    hasher: PasswordHasher,
    notifier: Notifier,
}

impl AccountManager {
    /// Create a new account manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `hasher` - Password hasher; shares the pepper with the auth core
    /// * `notifier` - Fire-and-forget mail queue for verification mails
    pub fn new(pool: Arc<PgPool>, hasher: PasswordHasher, notifier: Notifier) -> Self {
        Self {
            pool,
            hasher,
            notifier,
        }
    }

    /// Create a new account.
    ///
    /// Hashes the password before anything is stored and enqueues the
    /// email-verification mail. Mail delivery neither blocks nor fails the
    /// call.
    ///
    /// # Errors
    ///
    /// * `AccountError::UsernameTaken` - Username already exists
    /// * `AccountError::HashingFailed` - Hashing backend rejected the input
    pub async fn create(&self, new_account: NewAccount) -> AccountResult<AccountPublic> {
        let existing = sqlx::query("SELECT id FROM accounts WHERE username = $1")
            .bind(&new_account.username)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if existing.is_some() {
            return Err(AccountError::UsernameTaken);
        }

        let password_hash = self
            .hasher
            .hash(&new_account.password)
            .map_err(|_| AccountError::HashingFailed)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO accounts
                (username, email, phone_number, first_name, last_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(&new_account.username)
        .bind(&new_account.email)
        .bind(&new_account.phone_number)
        .bind(&new_account.first_name)
        .bind(&new_account.last_name)
        .bind(&password_hash)
        .bind(new_account.role.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        let account = Account::from_row(&row)?;

        self.notifier.send(VerificationMail {
            recipient: account.email.clone(),
            first_name: account.first_name.clone(),
        });

        tracing::info!(username = %account.username, role = %account.role, "account created");

        Ok(account.public())
    }

    /// Fetch an account by ID.
    pub async fn get(&self, id: AccountId) -> AccountResult<Option<AccountPublic>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| Ok(Account::from_row(&r)?.public())).transpose()
    }

    /// Fetch an account by email address.
    pub async fn get_by_email(&self, email: &str) -> AccountResult<Option<AccountPublic>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| Ok(Account::from_row(&r)?.public())).transpose()
    }

    /// Fetch an account by phone number.
    pub async fn get_by_phone(&self, phone: &str) -> AccountResult<Option<AccountPublic>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone_number = $1"
        ))
        .bind(phone)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| Ok(Account::from_row(&r)?.public())).transpose()
    }

    /// List accounts, paginated.
    pub async fn list(&self, offset: i64, limit: i64) -> AccountResult<Vec<AccountPublic>> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter()
            .map(|r| Ok(Account::from_row(r)?.public()))
            .collect()
    }

    /// Apply a partial update to an account.
    ///
    /// Only supplied fields change; a supplied password is re-hashed before
    /// storage. Returns `None` when the account does not exist.
    ///
    /// # Errors
    ///
    /// * `AccountError::HashingFailed` - Hashing backend rejected the input
    pub async fn update(
        &self,
        id: AccountId,
        patch: AccountPatch,
    ) -> AccountResult<Option<AccountPublic>> {
        let select = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let Some(row) = sqlx::query(&select)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let mut account = Account::from_row(&row)?;

        let password_hash = match &patch.password {
            Some(password) => Some(
                self.hasher
                    .hash(password)
                    .map_err(|_| AccountError::HashingFailed)?,
            ),
            None => None,
        };

        account.apply_patch(&patch, password_hash);

        sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = $1, last_name = $2, password_hash = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .bind(account.updated_at.naive_utc())
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(Some(account.public()))
    }

    /// Mark an email address as verified.
    ///
    /// Returns `false` when no account carries that email address.
    pub async fn mark_email_verified(&self, email: &str) -> AccountResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET email_verified = TRUE, updated_at = NOW() WHERE email = $1",
        )
        .bind(email)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
