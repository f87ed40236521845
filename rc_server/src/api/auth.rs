//! Authentication API handlers.
//!
//! Login is the only authentication endpoint: sessions are stateless
//! bearer tokens, so there is nothing to log out of server-side.
//!
//! Login with a back-office role:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "ops@example.com", "password": "Pass123!", "role": "SYSTEM_USER"}'
//! ```
//!
//! End-user (`APP_USER`) logins must additionally present a pre-issued
//! application token in the `Authorization` header - a channel deliberately
//! separate from the login body:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -H "Authorization: Bearer $APP_TOKEN" \
//!   -d '{"username": "user@example.com", "password": "Pass123!", "role": "APP_USER"}'
//! ```

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use rewards_catalog::account::Role;
use rewards_catalog::auth::Credential;
use serde::{Deserialize, Serialize};

use super::middleware::bearer_token;
use super::{AppState, ErrorResponse, auth_error};

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Public-safe principal projection: identifier and role, nothing else.
#[derive(Debug, Serialize)]
pub struct PrincipalBody {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub principal: PrincipalBody,
}

/// Authenticate a caller and issue a session token.
///
/// # Response
///
/// On success, returns `200 OK`:
/// ```json
/// {
///   "message": "authenticated successfully",
///   "access_token": "eyJhbGciOiJIUzI1NiIs...",
///   "principal": { "username": "ops@example.com", "role": "SYSTEM_USER" }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown identifier or wrong password (one shared
///   message), missing or invalid application token for `APP_USER`
/// - `403 Forbidden`: inactive account, or requested role does not match
///   the account role
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let app_token = bearer_token(&headers);

    let credential = Credential {
        username: payload.username,
        password: payload.password,
        role: payload.role,
    };

    match state.auth.login(credential, app_token).await {
        Ok(outcome) => Ok(Json(LoginResponse {
            message: "authenticated successfully".to_string(),
            access_token: outcome.token,
            principal: PrincipalBody {
                username: outcome.principal.username,
                role: outcome.principal.role,
            },
        })),
        Err(err) => Err(auth_error(err)),
    }
}
