//! # Rewards Catalog
//!
//! Core library for a multi-tenant rewards catalog and account platform.
//!
//! The library is split into a small number of focused modules:
//!
//! - [`auth`]: credential verification, password hashing, signed session
//!   tokens, and the role-gated login protocol
//! - [`account`]: account records and account management (create, lookup,
//!   partial update, email verification)
//! - [`catalog`]: per-company product catalog with category summaries
//! - [`db`]: PostgreSQL connection pooling and the account store used by the
//!   authentication core
//! - [`notify`]: fire-and-forget email notification queue
//!
//! ## Example
//!
//! ```no_run
//! use rewards_catalog::auth::{Algorithm, AuthConfig, AuthManager, Credential};
//! use rewards_catalog::account::Role;
//! use rewards_catalog::db::{Database, DatabaseConfig, PgAccountRepository};
//! use rewards_catalog::notify::Notifier;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default()).await?;
//!     let store = Arc::new(PgAccountRepository::new(db.pool().clone()));
//!     let config = AuthConfig {
//!         token_secret: "0123456789abcdef0123456789abcdef".to_string(),
//!         token_algorithm: Algorithm::HS256,
//!         token_ttl: None,
//!         password_pepper: "0123456789abcdef".to_string(),
//!         require_verified_email: false,
//!     };
//!     let auth = AuthManager::new(store, config, Notifier::disabled());
//!
//!     let credential = Credential {
//!         username: "ops@example.com".to_string(),
//!         password: "SecurePass123".to_string(),
//!         role: Role::SystemUser,
//!     };
//!     let outcome = auth.login(credential, None).await?;
//!     println!("session token for {}", outcome.principal.username);
//!     Ok(())
//! }
//! ```

/// Accounts and account management.
pub mod account;

/// Authentication and authorization core.
pub mod auth;

/// Product catalog.
pub mod catalog;

/// Database pooling and stores.
pub mod db;

/// Asynchronous email notifications.
pub mod notify;

pub use account::{Account, AccountManager, AccountPatch, AccountPublic, NewAccount, Role};
pub use auth::{AuthConfig, AuthError, AuthManager, Credential, LoginOutcome, Principal};
pub use catalog::CatalogManager;
pub use db::{CredentialStore, Database, DatabaseConfig, PgAccountRepository};
pub use notify::{Notifier, spawn_mailer};
