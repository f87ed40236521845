//! Account data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, postgres::PgRow};

/// Account ID type
pub type AccountId = i64;

/// Account status sentinel for active accounts.
pub const STATUS_ACTIVE: i16 = 1;

/// Account status sentinel for inactive accounts.
pub const STATUS_INACTIVE: i16 = 0;

/// Account role.
///
/// Serialized with the exact wire names; role comparison during login is
/// exact and case-sensitive, there is no mapping or aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Back-office operator.
    #[serde(rename = "SYSTEM_USER")]
    SystemUser,
    /// End user of the client application.
    #[serde(rename = "APP_USER")]
    AppUser,
    /// A client application itself, the subject of app tokens.
    #[serde(rename = "APP_CLIENT")]
    AppClient,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemUser => "SYSTEM_USER",
            Role::AppUser => "APP_USER",
            Role::AppClient => "APP_CLIENT",
        }
    }

    /// Parse a wire name back into a role.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "SYSTEM_USER" => Some(Role::SystemUser),
            "APP_USER" => Some(Role::AppUser),
            "APP_CLIENT" => Some(Role::AppClient),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account record.
///
/// Carries the password digest and therefore never implements `Serialize`;
/// use [`Account::public`] for anything that leaves the process.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    /// Login identifier. The username is itself an email address.
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    /// One-way digest of the password. Never plaintext.
    pub password_hash: String,
    pub role: Role,
    /// Numeric account status; [`STATUS_ACTIVE`] is the only state that
    /// may log in.
    pub status: i16,
    pub email_verified: bool,
    /// Failed-login counter, owned by account management. The auth core
    /// reads accounts but never touches this field.
    pub login_attempts: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether the account is in the active state.
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// Public-safe projection of this account.
    pub fn public(&self) -> AccountPublic {
        AccountPublic {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            status: self.status,
            email_verified: self.email_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Map a full account row.
    ///
    /// Expects the column list used by all account queries: id, username,
    /// email, phone_number, first_name, last_name, password_hash, role,
    /// status, email_verified, login_attempts, created_at, updated_at.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let role_raw: String = row.try_get("role")?;
        let role = Role::parse(&role_raw).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "role".into(),
            source: format!("unknown role '{role_raw}'").into(),
        })?;

        Ok(Account {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            password_hash: row.try_get("password_hash")?,
            role,
            status: row.try_get("status")?,
            email_verified: row.try_get("email_verified")?,
            login_attempts: row.try_get("login_attempts")?,
            created_at: row.try_get::<chrono::NaiveDateTime, _>("created_at")?.and_utc(),
            updated_at: row.try_get::<chrono::NaiveDateTime, _>("updated_at")?.and_utc(),
        })
    }

    /// Apply a partial update.
    ///
    /// The single merge point for patches: only supplied fields change,
    /// `updated_at` is bumped. The password arrives pre-hashed because the
    /// model layer never sees plaintext.
    pub fn apply_patch(&mut self, patch: &AccountPatch, password_hash: Option<String>) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        self.updated_at = Utc::now();
    }
}

/// Input for account creation. The password arrives in plaintext and is
/// hashed before anything is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Role,
}

/// Partial account update.
///
/// Absent fields are left untouched. The username, email, and phone number
/// are lookup keys and cannot be changed through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// New plaintext password, re-hashed on application.
    pub password: Option<String>,
}

/// Public-safe account projection: everything except the password digest.
#[derive(Debug, Clone, Serialize)]
pub struct AccountPublic {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: i16,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
