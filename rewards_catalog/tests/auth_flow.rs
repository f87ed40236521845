//! Integration tests for the login protocol and session guard.
//!
//! Exercises the full login state machine against an in-memory account
//! store: credential checks, the status gate, the APP_USER dual-credential
//! path, role matching, and stateless re-authentication.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rewards_catalog::account::{Account, AccountId, Role, STATUS_ACTIVE, STATUS_INACTIVE};
use rewards_catalog::auth::{
    Algorithm, AuthConfig, AuthError, AuthManager, Credential, PasswordHasher, TokenError,
};
use rewards_catalog::db::CredentialStore;
use rewards_catalog::notify::Notifier;

const SECRET: &str = "integration_test_secret_0123456789ab";
const PEPPER: &str = "integration_pepper";

/// In-memory account store standing in for the database.
#[derive(Default)]
struct MemoryStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl MemoryStore {
    fn with_account(self, account: Account) -> Self {
        self.accounts.lock().unwrap().insert(account.id, account);
        self
    }

    fn remove(&self, id: AccountId) {
        self.accounts.lock().unwrap().remove(&id);
    }

    fn set_status(&self, id: AccountId, status: i16) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&id) {
            account.status = status;
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }
}

fn account(id: AccountId, username: &str, password: &str, role: Role) -> Account {
    let now = Utc::now();
    Account {
        id,
        username: username.to_string(),
        email: username.to_string(),
        phone_number: "3000000000".to_string(),
        first_name: "Test".to_string(),
        last_name: "Account".to_string(),
        password_hash: PasswordHasher::new(PEPPER).hash(password).unwrap(),
        role,
        status: STATUS_ACTIVE,
        email_verified: true,
        login_attempts: 0,
        created_at: now,
        updated_at: now,
    }
}

fn config() -> AuthConfig {
    AuthConfig {
        token_secret: SECRET.to_string(),
        token_algorithm: Algorithm::HS256,
        token_ttl: None,
        password_pepper: PEPPER.to_string(),
        require_verified_email: false,
    }
}

fn manager_with(store: MemoryStore) -> (AuthManager, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let auth = AuthManager::new(store.clone(), config(), Notifier::disabled());
    (auth, store)
}

fn credential(username: &str, password: &str, role: Role) -> Credential {
    Credential {
        username: username.to_string(),
        password: password.to_string(),
        role,
    }
}

#[tokio::test]
async fn test_system_user_login_and_authenticate_round_trip() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    let outcome = auth
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await
        .expect("login should succeed");

    assert_eq!(outcome.principal.username, "a@x.com");
    assert_eq!(outcome.principal.role, Role::SystemUser);
    assert!(!outcome.token.is_empty());

    let principal = auth
        .authenticate(&outcome.token)
        .await
        .expect("issued token should authenticate");
    assert_eq!(principal.username, "a@x.com");
    assert_eq!(principal.role, Role::SystemUser);
}

#[tokio::test]
async fn test_unknown_account_fails_with_account_not_found() {
    let (auth, _) = manager_with(MemoryStore::default());

    let result = auth
        .login(credential("ghost@x.com", "secret123", Role::SystemUser), None)
        .await;

    assert!(matches!(result, Err(AuthError::AccountNotFound)));
}

#[tokio::test]
async fn test_wrong_password_fails_with_invalid_credentials() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    let result = auth
        .login(credential("a@x.com", "wrong-password", Role::SystemUser), None)
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_credential_failures_are_indistinguishable_externally() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    let not_found = auth
        .login(credential("ghost@x.com", "secret123", Role::SystemUser), None)
        .await
        .unwrap_err();
    let bad_password = auth
        .login(credential("a@x.com", "wrong", Role::SystemUser), None)
        .await
        .unwrap_err();

    assert_eq!(not_found.client_message(), bad_password.client_message());
}

#[tokio::test]
async fn test_inactive_account_fails_even_with_correct_credentials() {
    let mut inactive = account(1, "a@x.com", "secret123", Role::SystemUser);
    inactive.status = STATUS_INACTIVE;
    let (auth, _) = manager_with(MemoryStore::default().with_account(inactive));

    let result = auth
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await;

    assert!(matches!(result, Err(AuthError::AccountInactive)));
}

#[tokio::test]
async fn test_password_gate_runs_before_status_gate() {
    let mut inactive = account(1, "a@x.com", "secret123", Role::SystemUser);
    inactive.status = STATUS_INACTIVE;
    let (auth, _) = manager_with(MemoryStore::default().with_account(inactive));

    // A caller that has not proven credential possession learns nothing
    // about the account state.
    let result = auth
        .login(credential("a@x.com", "wrong", Role::SystemUser), None)
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_app_user_without_app_token_fails_with_app_token_required() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "u@x.com", "secret123", Role::AppUser)),
    );

    let result = auth
        .login(credential("u@x.com", "secret123", Role::AppUser), None)
        .await;

    assert!(matches!(result, Err(AuthError::AppTokenRequired)));
}

#[tokio::test]
async fn test_app_user_with_valid_app_token_succeeds() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "u@x.com", "secret123", Role::AppUser)),
    );

    let app_token = auth.issue_app_token("client-42").unwrap();
    let outcome = auth
        .login(
            credential("u@x.com", "secret123", Role::AppUser),
            Some(&app_token),
        )
        .await
        .expect("login with app token should succeed");

    assert_eq!(outcome.principal.role, Role::AppUser);
}

#[tokio::test]
async fn test_tampered_app_token_fails_with_app_token_invalid() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "u@x.com", "secret123", Role::AppUser)),
    );

    let mut app_token = auth.issue_app_token("client-42").unwrap();
    app_token.push('x');
    let result = auth
        .login(
            credential("u@x.com", "secret123", Role::AppUser),
            Some(&app_token),
        )
        .await;

    assert!(matches!(result, Err(AuthError::AppTokenInvalid(_))));
}

#[tokio::test]
async fn test_garbage_app_token_surfaces_decode_failure() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "u@x.com", "secret123", Role::AppUser)),
    );

    let result = auth
        .login(
            credential("u@x.com", "secret123", Role::AppUser),
            Some("garbage"),
        )
        .await;

    assert!(matches!(
        result,
        Err(AuthError::AppTokenInvalid(TokenError::Malformed))
    ));
}

#[tokio::test]
async fn test_session_token_is_accepted_as_app_token() {
    // Session and app tokens share one signing domain with no kind
    // discriminator; the format cannot tell them apart.
    let (auth, _) = manager_with(
        MemoryStore::default()
            .with_account(account(1, "a@x.com", "secret123", Role::SystemUser))
            .with_account(account(2, "u@x.com", "secret123", Role::AppUser)),
    );

    let session_token = auth
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await
        .unwrap()
        .token;

    let outcome = auth
        .login(
            credential("u@x.com", "secret123", Role::AppUser),
            Some(&session_token),
        )
        .await;

    assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_role_mismatch_regardless_of_password_correctness() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    // Correct password, wrong requested role. The APP_USER path also
    // demands an app token, so present a valid one to prove the mismatch
    // is what rejects the login.
    let app_token = auth.issue_app_token("client-42").unwrap();
    let result = auth
        .login(
            credential("a@x.com", "secret123", Role::AppUser),
            Some(&app_token),
        )
        .await;

    match result {
        Err(AuthError::RoleMismatch { requested, actual }) => {
            assert_eq!(requested, Role::AppUser);
            assert_eq!(actual, Role::SystemUser);
        }
        other => panic!("expected RoleMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_authenticate_rejects_tampered_bearer() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    let mut token = auth
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await
        .unwrap()
        .token;
    token.push('x');

    let result = auth.authenticate(&token).await;
    assert!(matches!(result, Err(AuthError::Unauthenticated)));
}

#[tokio::test]
async fn test_authenticate_rejects_deleted_account() {
    let (auth, store) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    let token = auth
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await
        .unwrap()
        .token;

    // The signature is still valid, but the subject no longer resolves.
    store.remove(1);
    let result = auth.authenticate(&token).await;
    assert!(matches!(result, Err(AuthError::PrincipalNotFound)));
}

#[tokio::test]
async fn test_authenticate_rejects_account_disabled_after_issuance() {
    let (auth, store) = manager_with(
        MemoryStore::default().with_account(account(1, "a@x.com", "secret123", Role::SystemUser)),
    );

    let token = auth
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await
        .unwrap()
        .token;

    store.set_status(1, STATUS_INACTIVE);
    let result = auth.authenticate(&token).await;
    assert!(matches!(result, Err(AuthError::AccountInactive)));
}

#[tokio::test]
async fn test_require_role_gates_capabilities() {
    let (auth, _) = manager_with(
        MemoryStore::default().with_account(account(1, "u@x.com", "secret123", Role::AppUser)),
    );

    let app_token = auth.issue_app_token("client-42").unwrap();
    let outcome = auth
        .login(
            credential("u@x.com", "secret123", Role::AppUser),
            Some(&app_token),
        )
        .await
        .unwrap();

    let principal = auth.authenticate(&outcome.token).await.unwrap();
    assert!(matches!(
        principal.require_role(Role::SystemUser),
        Err(AuthError::Forbidden)
    ));
}

#[tokio::test]
async fn test_unverified_email_gate_is_a_policy_toggle() {
    let mut unverified = account(1, "a@x.com", "secret123", Role::SystemUser);
    unverified.email_verified = false;

    // Default policy: the gate is off and the login succeeds.
    let (auth, _) = manager_with(MemoryStore::default().with_account(unverified.clone()));
    assert!(
        auth.login(credential("a@x.com", "secret123", Role::SystemUser), None)
            .await
            .is_ok()
    );

    // With the policy enabled the same credentials are rejected.
    let store = Arc::new(MemoryStore::default().with_account(unverified));
    let strict = AuthManager::new(
        store,
        AuthConfig {
            require_verified_email: true,
            ..config()
        },
        Notifier::disabled(),
    );
    let result = strict
        .login(credential("a@x.com", "secret123", Role::SystemUser), None)
        .await;
    assert!(matches!(result, Err(AuthError::EmailUnverified)));
}
