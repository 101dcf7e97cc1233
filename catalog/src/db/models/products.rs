//! Database models for products.

use crate::types::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database representation of a product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to insert a new product. The id and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreateDBRequest {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
}

/// Partial update of an existing product.
///
/// `None` leaves a column unchanged. `description` is doubly optional so that
/// `Some(None)` can clear it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdateDBRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<Option<String>>,
    pub category: Option<String>,
}

impl ProductUpdateDBRequest {
    /// Apply the supplied fields to an in-memory row, leaving the rest untouched.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
    }
}

/// Response from database after creating, fetching or updating a product
pub type ProductDBResponse = Product;
