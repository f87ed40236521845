//! Session guard middleware for protected endpoints.
//!
//! Extracts the bearer token from the `Authorization` header, resolves the
//! live principal through [`AuthManager::authenticate`], and injects it
//! into request extensions. Handlers extract it with
//! `Extension<Principal>`. A missing or invalid token rejects the request
//! before any downstream business logic executes.
//!
//! [`AuthManager::authenticate`]: rewards_catalog::auth::AuthManager::authenticate

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use rewards_catalog::auth::AuthError;

use super::{AppState, ErrorResponse, auth_error};

/// Extract the bearer token from an `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware that validates bearer tokens and injects the
/// resolved principal.
///
/// # Behavior
///
/// - **Success**: token valid and subject still resolves → `Principal`
///   into request extensions → next handler
/// - **Missing header / invalid token / vanished subject**: rejection with
///   the sanitized auth error body
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| auth_error(AuthError::Unauthenticated))?
        .to_string();

    match state.auth.authenticate(&token).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(err) => Err(auth_error(err)),
    }
}
