//! Account management API handlers.
//!
//! Thin pass-through over [`AccountManager`]: payload in, manager call,
//! projection out. All endpoints except the email-verification link sit
//! behind the session guard; account creation additionally requires the
//! `SYSTEM_USER` role.
//!
//! [`AccountManager`]: rewards_catalog::account::AccountManager

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use rewards_catalog::account::{
    AccountError, AccountPatch, AccountPublic, NewAccount, Role,
};
use rewards_catalog::auth::Principal;
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorResponse, auth_error};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn account_error(err: AccountError) -> (StatusCode, Json<ErrorResponse>) {
    match &err {
        AccountError::UsernameTaken => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        ),
        AccountError::Database(_) | AccountError::HashingFailed => {
            tracing::error!(error = %err, "account operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal server error".to_string(),
                }),
            )
        }
    }
}

fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "account not found".to_string(),
        }),
    )
}

/// Create a new account. Requires the `SYSTEM_USER` role.
///
/// The password arrives in plaintext and is hashed before storage; the
/// verification mail is enqueued fire-and-forget.
///
/// # Errors
///
/// - `400 Bad Request`: username already registered
/// - `403 Forbidden`: caller is not a `SYSTEM_USER`
pub async fn create_account(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewAccount>,
) -> Result<(StatusCode, Json<AccountPublic>), (StatusCode, Json<ErrorResponse>)> {
    principal
        .require_role(Role::SystemUser)
        .map_err(auth_error)?;

    match state.accounts.create(payload).await {
        Ok(account) => Ok((StatusCode::CREATED, Json(account))),
        Err(err) => Err(account_error(err)),
    }
}

/// List accounts, paginated with `offset` and `limit` (capped at 100).
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AccountPublic>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query.limit.clamp(1, 100);

    match state.accounts.list(query.offset.max(0), limit).await {
        Ok(accounts) => Ok(Json(accounts)),
        Err(err) => Err(account_error(err)),
    }
}

/// Get an account by ID.
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AccountPublic>, (StatusCode, Json<ErrorResponse>)> {
    match state.accounts.get(id).await {
        Ok(Some(account)) => Ok(Json(account)),
        Ok(None) => Err(not_found()),
        Err(err) => Err(account_error(err)),
    }
}

/// Get an account by email address.
pub async fn get_account_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AccountPublic>, (StatusCode, Json<ErrorResponse>)> {
    match state.accounts.get_by_email(&email).await {
        Ok(Some(account)) => Ok(Json(account)),
        Ok(None) => Err(not_found()),
        Err(err) => Err(account_error(err)),
    }
}

/// Get an account by phone number.
pub async fn get_account_by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<AccountPublic>, (StatusCode, Json<ErrorResponse>)> {
    match state.accounts.get_by_phone(&phone).await {
        Ok(Some(account)) => Ok(Json(account)),
        Ok(None) => Err(not_found()),
        Err(err) => Err(account_error(err)),
    }
}

/// Apply a partial update to an account.
///
/// Only fields present in the body change; a supplied password is
/// re-hashed before storage.
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<AccountPatch>,
) -> Result<Json<AccountPublic>, (StatusCode, Json<ErrorResponse>)> {
    match state.accounts.update(id, patch).await {
        Ok(Some(account)) => Ok(Json(account)),
        Ok(None) => Err(not_found()),
        Err(err) => Err(account_error(err)),
    }
}

/// Confirm an email address. This is the public endpoint behind the link
/// in the verification mail.
pub async fn verify_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.accounts.mark_email_verified(&email).await {
        Ok(true) => Ok(Json(MessageResponse {
            message: "email verified; you can now log in".to_string(),
        })),
        Ok(false) => Err(not_found()),
        Err(err) => Err(account_error(err)),
    }
}
