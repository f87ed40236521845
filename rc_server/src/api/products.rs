//! Product catalog API handlers.
//!
//! Thin pass-through over [`CatalogManager`]. Every endpoint sits behind
//! the session guard.
//!
//! List a company's catalog:
//! ```bash
//! curl http://localhost:8080/api/v1/products/summary?company_id=2 \
//!   -H "Authorization: Bearer TOKEN"
//! ```
//!
//! [`CatalogManager`]: rewards_catalog::catalog::CatalogManager

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rewards_catalog::catalog::{CatalogError, NewProduct, Product, ProductPatch, ProductSummary};
use serde::Deserialize;

use super::{AppState, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub company_id: i64,
}

fn catalog_error(err: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    match &err {
        CatalogError::ProductNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        ),
        CatalogError::Database(_) => {
            tracing::error!(error = %err, "catalog operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal server error".to_string(),
                }),
            )
        }
    }
}

/// Create a product.
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.create(payload).await {
        Ok(product) => Ok((StatusCode::CREATED, Json(product))),
        Err(err) => Err(catalog_error(err)),
    }
}

/// Get a product by ID.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.get(id).await {
        Ok(product) => Ok(Json(product)),
        Err(err) => Err(catalog_error(err)),
    }
}

/// Apply a partial update to a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.update(id, patch).await {
        Ok(product) => Ok(Json(product)),
        Err(err) => Err(catalog_error(err)),
    }
}

/// Delete a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.delete(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(catalog_error(err)),
    }
}

/// List a company's products with their category names.
pub async fn list_company_catalog(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Vec<ProductSummary>>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.list_summary(query.company_id).await {
        Ok(summaries) => Ok(Json(summaries)),
        Err(err) => Err(catalog_error(err)),
    }
}
