//! Authentication and authorization core.
//!
//! This module implements stateless, token-based authentication:
//! - Argon2id password hashing with a server-side pepper
//! - signed session tokens carrying subject identity and role
//! - a role-gated, dual-credential login protocol: `APP_USER` logins must
//!   additionally present a pre-issued application token in the
//!   authorization channel, `SYSTEM_USER` logins must not
//! - a session guard that re-resolves the live account on every protected
//!   call, so the account record stays the source of truth even without
//!   token expiry or revocation
//!
//! Session tokens and application tokens share a single signing key and
//! codec. The format carries no kind discriminator, so a token is only ever
//! as meaningful as the context it is presented in.
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
//!         token_secret: std::env::var("TOKEN_SECRET")?,
//!         token_algorithm: Algorithm::HS256,
//!         token_ttl: None,
//!         password_pepper: std::env::var("PASSWORD_PEPPER")?,
//!         require_verified_email: false,
//!     };
//!     let auth = AuthManager::new(store, config, Notifier::disabled());
//!
//!     let outcome = auth
//!         .login(
//!             Credential {
//!                 username: "ops@example.com".to_string(),
//!                 password: "SecurePass123".to_string(),
//!                 role: Role::SystemUser,
//!             },
//!             None,
//!         )
//!         .await?;
//!
//!     let principal = auth.authenticate(&outcome.token).await?;
//!     assert_eq!(principal.username, "ops@example.com");
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod hasher;
pub mod manager;
pub mod models;
pub mod token;

pub use errors::{AuthError, AuthResult};
pub use hasher::PasswordHasher;
pub use manager::AuthManager;
pub use models::{Credential, LoginOutcome, Principal};
pub use token::{Algorithm, TokenClaims, TokenCodec, TokenError};

use chrono::Duration;

/// Immutable authentication configuration.
///
/// Loaded once at process start and injected into [`AuthManager`]; never
/// mutated afterwards. Every auth operation is a pure function of its inputs
/// plus this configuration, which is what makes the core thread-safe without
/// locking.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key used to sign and verify all tokens.
    pub token_secret: String,
    /// Signing algorithm for all tokens.
    pub token_algorithm: Algorithm,
    /// Session token lifetime. `None` disables expiry entirely: issued
    /// tokens carry no `exp` claim and verification does not check one.
    pub token_ttl: Option<Duration>,
    /// Server-side pepper appended to passwords before hashing.
    pub password_pepper: String,
    /// When enabled, logins against unverified email addresses fail after
    /// re-sending the verification mail.
    pub require_verified_email: bool,
}
