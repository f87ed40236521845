//! Product catalog data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, postgres::PgRow};

/// Product ID type
pub type ProductId = i64;

/// Product record.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub company_id: i64,
    pub category_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub description: String,
    pub points_value: i32,
    pub monetary_value: f64,
    pub stock_quantity: i32,
    pub image_url: String,
    pub status: i16,
    pub currency_id: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Map a full product row.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Product {
            id: row.try_get("id")?,
            company_id: row.try_get("company_id")?,
            category_id: row.try_get("category_id")?,
            product_code: row.try_get("product_code")?,
            product_name: row.try_get("product_name")?,
            description: row.try_get("description")?,
            points_value: row.try_get("points_value")?,
            monetary_value: row.try_get("monetary_value")?,
            stock_quantity: row.try_get("stock_quantity")?,
            image_url: row.try_get("image_url")?,
            status: row.try_get("status")?,
            currency_id: row.try_get("currency_id")?,
            created_at: row.try_get::<chrono::NaiveDateTime, _>("created_at")?.and_utc(),
            updated_at: row.try_get::<chrono::NaiveDateTime, _>("updated_at")?.and_utc(),
        })
    }

    /// Apply a partial update. Only supplied fields change; `updated_at` is
    /// bumped.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(product_code) = &patch.product_code {
            self.product_code = product_code.clone();
        }
        if let Some(product_name) = &patch.product_name {
            self.product_name = product_name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(points_value) = patch.points_value {
            self.points_value = points_value;
        }
        if let Some(monetary_value) = patch.monetary_value {
            self.monetary_value = monetary_value;
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            self.stock_quantity = stock_quantity;
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Input for product creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub company_id: i64,
    pub category_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub description: String,
    pub points_value: i32,
    pub monetary_value: f64,
    pub stock_quantity: i32,
    pub image_url: String,
    #[serde(default)]
    pub status: i16,
    #[serde(default = "default_currency")]
    pub currency_id: i16,
}

fn default_currency() -> i16 {
    1
}

/// Partial product update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub points_value: Option<i32>,
    pub monetary_value: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
    pub status: Option<i16>,
}

/// Catalog listing entry: a product joined with its category name.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub product_name: String,
    pub category_id: i64,
    pub category_name: String,
    pub points_value: i32,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            company_id: 2,
            category_id: 3,
            product_code: "SKU-001".to_string(),
            product_name: "Stainless bottle".to_string(),
            description: "A half-litre insulated bottle".to_string(),
            points_value: 250,
            monetary_value: 19.99,
            stock_quantity: 40,
            image_url: "https://cdn.example.com/bottle.png".to_string(),
            status: 0,
            currency_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut product = product();
        let before = product.clone();

        product.apply_patch(&ProductPatch {
            points_value: Some(300),
            stock_quantity: Some(39),
            ..Default::default()
        });

        assert_eq!(product.points_value, 300);
        assert_eq!(product.stock_quantity, 39);
        assert_eq!(product.product_name, before.product_name);
        assert_eq!(product.monetary_value, before.monetary_value);
        assert!(product.updated_at >= before.updated_at);
    }
}
