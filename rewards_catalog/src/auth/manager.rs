//! Authentication manager: login protocol and session guard.

use std::sync::Arc;

use super::{
    AuthConfig,
    errors::{AuthError, AuthResult},
    hasher::PasswordHasher,
    models::{Credential, LoginOutcome, Principal},
    token::{TokenCodec, TokenError},
};
use crate::account::Role;
use crate::db::CredentialStore;
use crate::notify::{Notifier, VerificationMail};

/// Authentication manager
///
/// Stateless by construction: the signing configuration and pepper are
/// fixed at creation, the only awaits are the store lookups, and no step is
/// ever retried internally. Clones share the same store, codec, and
/// notification handle.
#[derive(Clone)]
pub struct AuthManager {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    codec: TokenCodec,
    notifier: Notifier,
    require_verified_email: bool,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `store` - Account lookup collaborator
    /// * `config` - Immutable signing and policy configuration
    /// * `notifier` - Fire-and-forget mail queue for verification mails
    pub fn new(store: Arc<dyn CredentialStore>, config: AuthConfig, notifier: Notifier) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(config.password_pepper),
            codec: TokenCodec::new(&config.token_secret, config.token_algorithm, config.token_ttl),
            notifier,
            require_verified_email: config.require_verified_email,
        }
    }

    /// Log a caller in and issue a session token.
    ///
    /// Runs the login gates in a fixed order, each one a hard stop:
    /// account lookup, password check, status check, email verification
    /// (policy toggle), the `APP_USER` application-token gate, and the
    /// exact role match. Role information is never revealed before
    /// credential possession and account liveness are proven.
    ///
    /// # Arguments
    ///
    /// * `credential` - Login identifier, password, and requested role
    /// * `app_token` - Bearer token from the authorization channel; only
    ///   consulted when the requested role is `APP_USER`
    ///
    /// # Errors
    ///
    /// * `AuthError::AccountNotFound` - Unknown login identifier
    /// * `AuthError::InvalidCredentials` - Password mismatch
    /// * `AuthError::AccountInactive` - Account not in the active state
    /// * `AuthError::EmailUnverified` - Verification required and pending
    /// * `AuthError::AppTokenRequired` - `APP_USER` login without app token
    /// * `AuthError::AppTokenInvalid` - App token failed to decode
    /// * `AuthError::RoleMismatch` - Requested role differs from stored role
    /// * `AuthError::Internal` - Signing subsystem failure
    pub async fn login(
        &self,
        credential: Credential,
        app_token: Option<&str>,
    ) -> AuthResult<LoginOutcome> {
        let account = self
            .store
            .find_by_username(&credential.username)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !self.hasher.verify(&credential.password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !account.is_active() {
            return Err(AuthError::AccountInactive);
        }

        if self.require_verified_email && !account.email_verified {
            // Re-send the verification mail; delivery never blocks or
            // fails the login call itself.
            self.notifier.send(VerificationMail {
                recipient: account.email.clone(),
                first_name: account.first_name.clone(),
            });
            return Err(AuthError::EmailUnverified);
        }

        // End-user logins carry a second credential: a pre-issued
        // application token presented in the authorization channel,
        // separate from the login body.
        if credential.role == Role::AppUser {
            let raw = app_token.ok_or(AuthError::AppTokenRequired)?;
            match self.codec.verify(raw) {
                Ok(_) => {}
                Err(TokenError::Internal(detail)) => {
                    tracing::error!(%detail, "app token validation failed in the signing backend");
                    return Err(AuthError::Internal(detail));
                }
                Err(err) => return Err(AuthError::AppTokenInvalid(err)),
            }
        }

        if credential.role != account.role {
            return Err(AuthError::RoleMismatch {
                requested: credential.role,
                actual: account.role,
            });
        }

        let token = self
            .codec
            .issue(&account.username, account.role)
            .map_err(|err| {
                tracing::error!(error = %err, username = %account.username, "failed to sign session token");
                AuthError::Internal(err.to_string())
            })?;

        tracing::info!(username = %account.username, role = %account.role, "login succeeded");

        Ok(LoginOutcome {
            token,
            principal: Principal {
                id: account.id,
                username: account.username,
                role: account.role,
            },
        })
    }

    /// Resolve the principal behind an inbound bearer token.
    ///
    /// The subject is re-resolved against the store on every call: with no
    /// token expiry or revocation list, the account record itself is the
    /// source of truth for whether the bearer is still authorized. An
    /// account deleted or disabled after issuance is rejected even though
    /// the token signature is still valid.
    ///
    /// # Errors
    ///
    /// * `AuthError::Unauthenticated` - Token failed to decode
    /// * `AuthError::PrincipalNotFound` - Subject no longer resolves
    /// * `AuthError::AccountInactive` - Subject resolved but was disabled
    /// * `AuthError::Internal` - Signing subsystem failure
    pub async fn authenticate(&self, bearer: &str) -> AuthResult<Principal> {
        let claims = match self.codec.verify(bearer) {
            Ok(claims) => claims,
            Err(TokenError::Internal(detail)) => {
                tracing::error!(%detail, "session token validation failed in the signing backend");
                return Err(AuthError::Internal(detail));
            }
            Err(_) => return Err(AuthError::Unauthenticated),
        };

        let account = self
            .store
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::PrincipalNotFound)?;

        if !account.is_active() {
            return Err(AuthError::AccountInactive);
        }

        Ok(Principal {
            id: account.id,
            username: account.username,
            role: account.role,
        })
    }

    /// Issue an application authorization token for a client application.
    ///
    /// App tokens are structurally identical to session tokens and signed
    /// with the same key; what makes them app tokens is the channel they
    /// are presented in, not their format.
    ///
    /// # Errors
    ///
    /// * `AuthError::Internal` - Signing subsystem failure
    pub fn issue_app_token(&self, client_id: &str) -> AuthResult<String> {
        self.codec
            .issue(client_id, Role::AppClient)
            .map_err(|err| AuthError::Internal(err.to_string()))
    }
}
