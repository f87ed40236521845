//! HTTP API for the rewards catalog server.
//!
//! # Architecture
//!
//! - **Axum**: async web framework
//! - **Tower**: CORS and middleware layers
//! - **Bearer tokens**: stateless authentication; the session guard
//!   middleware re-resolves the live account on every protected call
//!
//! # Modules
//!
//! - [`auth`]: login endpoint
//! - [`users`]: account management endpoints
//! - [`products`]: catalog endpoints
//! - [`middleware`]: session guard for protected endpoints
//! - [`request_id`]: request-id propagation for log correlation
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                              - Health check (public)
//! POST /api/v1/auth/login                   - Login (public)
//! GET  /api/v1/users/verify-email/{email}   - Email verification link (public)
//! POST /api/v1/users                        - Create account (SYSTEM_USER)
//! GET  /api/v1/users                        - List accounts (auth required)
//! GET  /api/v1/users/{id}                   - Get account (auth required)
//! GET  /api/v1/users/email/{email}          - Get account by email (auth required)
//! GET  /api/v1/users/phone/{phone}          - Get account by phone (auth required)
//! PUT  /api/v1/users/{id}                   - Update account (auth required)
//! POST /api/v1/products                     - Create product (auth required)
//! GET  /api/v1/products/summary?company_id= - Company catalog (auth required)
//! GET  /api/v1/products/{id}                - Get product (auth required)
//! PUT  /api/v1/products/{id}                - Update product (auth required)
//! DELETE /api/v1/products/{id}              - Delete product (auth required)
//! ```

pub mod auth;
pub mod middleware;
pub mod products;
pub mod request_id;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use rewards_catalog::{
    account::AccountManager, auth::AuthError, auth::AuthManager, catalog::CatalogManager,
};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; cheap due to the Arc wrappers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub accounts: Arc<AccountManager>,
    pub catalog: Arc<CatalogManager>,
    pub pool: Arc<PgPool>,
}

/// JSON error body shared by all handlers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an auth rejection to its HTTP response.
///
/// Internal failures are logged with full context here; the external body
/// only ever carries the sanitized client message.
pub(crate) fn auth_error(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    if err.status_code() >= 500 {
        tracing::error!(error = %err, "internal authentication failure");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    let root_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router(state: AppState) -> Router<AppState> {
    // Public routes (no session guard)
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/users/verify-email/{email}", get(users::verify_email));

    // Protected routes: the session guard rejects the request before any
    // handler logic runs.
    let protected_routes = Router::new()
        .route(
            "/users",
            post(users::create_account).get(users::list_accounts),
        )
        .route(
            "/users/{id}",
            get(users::get_account).put(users::update_account),
        )
        .route("/users/email/{email}", get(users::get_account_by_email))
        .route("/users/phone/{phone}", get(users::get_account_by_phone))
        .route("/products", post(products::create_product))
        .route("/products/summary", get(products::list_company_catalog))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_guard,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Probes database connectivity and returns `200 OK` when healthy or
/// `503 Service Unavailable` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
