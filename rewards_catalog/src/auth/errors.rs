//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::account::Role;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed
    #[error("password hashing failed")]
    HashingFailed,

    /// No account with the supplied login identifier
    #[error("account not found")]
    AccountNotFound,

    /// Password verification failed
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account exists but is not in the active state
    #[error("account is inactive or blocked")]
    AccountInactive,

    /// Account email address has not been verified yet
    #[error("email address has not been verified")]
    EmailUnverified,

    /// `APP_USER` login without an application token in the
    /// authorization channel
    #[error("an application authorization token is required for APP_USER logins")]
    AppTokenRequired,

    /// Application token failed to decode
    #[error("invalid application authorization token: {0}")]
    AppTokenInvalid(#[source] TokenError),

    /// Requested role does not match the stored account role
    #[error("access denied: requested role '{requested}' does not match account role '{actual}'")]
    RoleMismatch { requested: Role, actual: Role },

    /// Token verified but its subject no longer resolves to an account
    #[error("principal no longer exists")]
    PrincipalNotFound,

    /// Bearer token failed to decode
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated principal lacks the required role
    #[error("insufficient role")]
    Forbidden,

    /// Unexpected failure in the signing/decoding subsystem
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive
    /// information.
    ///
    /// Database and signing-backend errors are sanitized, and
    /// `AccountNotFound` collapses into the `InvalidCredentials` message so
    /// a caller cannot enumerate which login identifiers exist.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::HashingFailed | AuthError::Internal(_) => {
                "internal server error".to_string()
            }
            AuthError::AccountNotFound | AuthError::InvalidCredentials => {
                "invalid username or password".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// HTTP status code equivalent for this rejection.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::AccountNotFound
            | AuthError::InvalidCredentials
            | AuthError::AppTokenRequired
            | AuthError::AppTokenInvalid(_)
            | AuthError::PrincipalNotFound
            | AuthError::Unauthenticated => 401,
            AuthError::AccountInactive
            | AuthError::EmailUnverified
            | AuthError::RoleMismatch { .. }
            | AuthError::Forbidden => 403,
            AuthError::Database(_) | AuthError::HashingFailed | AuthError::Internal(_) => 500,
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_bad_password_share_client_message() {
        assert_eq!(
            AuthError::AccountNotFound.client_message(),
            AuthError::InvalidCredentials.client_message(),
        );
    }

    #[test]
    fn test_internal_detail_stays_internal() {
        let err = AuthError::Internal("signing key rejected by backend".to_string());
        assert_eq!(err.client_message(), "internal server error");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_forbidden_is_distinct_from_unauthenticated() {
        assert_eq!(AuthError::Unauthenticated.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
    }

    #[test]
    fn test_role_mismatch_names_both_roles() {
        let err = AuthError::RoleMismatch {
            requested: Role::AppUser,
            actual: Role::SystemUser,
        };
        let msg = err.to_string();
        assert!(msg.contains("APP_USER"));
        assert!(msg.contains("SYSTEM_USER"));
    }
}
