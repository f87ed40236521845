//! Authentication data models.

use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use crate::account::{AccountId, Role};

/// Ephemeral login input. Never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    /// Login identifier (the account username, itself an email address).
    pub username: String,
    /// Plaintext password, consumed by verification only.
    pub password: String,
    /// Role the caller is requesting to log in as.
    pub role: Role,
}

/// The authenticated identity resolved from a valid token.
///
/// Carries live account state, re-read from the store at resolution time,
/// not whatever the token claimed at issuance.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: AccountId,
    pub username: String,
    pub role: Role,
}

impl Principal {
    /// Check that this principal holds the required role.
    ///
    /// # Errors
    ///
    /// * `AuthError::Forbidden` - Principal is authenticated but lacks the
    ///   role; distinct from an authentication failure
    pub fn require_role(&self, role: Role) -> AuthResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Successful login result: the signed session token plus the public-safe
/// projection of the account. The password digest never leaves the store.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub principal: Principal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role_matches() {
        let principal = Principal {
            id: 1,
            username: "a@x.com".to_string(),
            role: Role::SystemUser,
        };
        assert!(principal.require_role(Role::SystemUser).is_ok());
    }

    #[test]
    fn test_require_role_rejects_with_forbidden() {
        let principal = Principal {
            id: 1,
            username: "a@x.com".to_string(),
            role: Role::AppUser,
        };
        assert!(matches!(
            principal.require_role(Role::SystemUser),
            Err(AuthError::Forbidden)
        ));
    }
}
