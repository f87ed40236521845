//! Catalog manager implementation.

use std::sync::Arc;

use sqlx::{PgPool, Row};
use thiserror::Error;

use super::models::{NewProduct, Product, ProductId, ProductPatch, ProductSummary};

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Product not found
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

const PRODUCT_COLUMNS: &str = "id, company_id, category_id, product_code, product_name, \
     description, points_value, monetary_value, stock_quantity, image_url, status, \
     currency_id, created_at, updated_at";

/// Catalog manager
#[derive(Clone)]
pub struct CatalogManager {
    pool: Arc<PgPool>,
}

impl CatalogManager {
    /// Create a new catalog manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a product.
    pub async fn create(&self, new_product: NewProduct) -> CatalogResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products
                (company_id, category_id, product_code, product_name, description,
                 points_value, monetary_value, stock_quantity, image_url, status, currency_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(new_product.company_id)
        .bind(new_product.category_id)
        .bind(&new_product.product_code)
        .bind(&new_product.product_name)
        .bind(&new_product.description)
        .bind(new_product.points_value)
        .bind(new_product.monetary_value)
        .bind(new_product.stock_quantity)
        .bind(&new_product.image_url)
        .bind(new_product.status)
        .bind(new_product.currency_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Product::from_row(&row)?)
    }

    /// Fetch a product by ID.
    ///
    /// # Errors
    ///
    /// * `CatalogError::ProductNotFound` - No product with that ID
    pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(CatalogError::ProductNotFound(id))?;

        Ok(Product::from_row(&row)?)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// * `CatalogError::ProductNotFound` - No product with that ID
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> CatalogResult<Product> {
        let mut product = self.get(id).await?;
        product.apply_patch(&patch);

        sqlx::query(
            r#"
            UPDATE products
            SET product_code = $1, product_name = $2, description = $3, points_value = $4,
                monetary_value = $5, stock_quantity = $6, image_url = $7, status = $8,
                updated_at = $9
            WHERE id = $10
            "#,
        )
        .bind(&product.product_code)
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(product.points_value)
        .bind(product.monetary_value)
        .bind(product.stock_quantity)
        .bind(&product.image_url)
        .bind(product.status)
        .bind(product.updated_at.naive_utc())
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// * `CatalogError::ProductNotFound` - No product with that ID
    pub async fn delete(&self, id: ProductId) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound(id));
        }
        Ok(())
    }

    /// List a company's products joined with their category names.
    pub async fn list_summary(&self, company_id: i64) -> CatalogResult<Vec<ProductSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.product_name, p.category_id, c.category_name,
                   p.points_value, p.image_url
            FROM products p
            INNER JOIN categories c ON c.id = p.category_id
            WHERE p.company_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| ProductSummary {
                id: row.get("id"),
                product_name: row.get("product_name"),
                category_id: row.get("category_id"),
                category_name: row.get("category_name"),
                points_value: row.get("points_value"),
                image_url: row.get("image_url"),
            })
            .collect())
    }
}
