//! In-memory product repository.
//!
//! Stores all products in process memory behind a lock. It's suitable for tests and local
//! development without PostgreSQL. Products are lost on restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use parking_lot::RwLock;

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{products::ProductFilter, repository::Repository};
use crate::db::models::products::{Product, ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::types::{ProductId, SortOrder};

#[derive(Default)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    /// Last id handed out. Only ever grows, so deleted ids are never reissued.
    last_id: ProductId,
}

/// In-memory implementation of the product [`Repository`].
///
/// Rows are kept in id order, which doubles as insertion order.
///
/// # Example
/// ```ignore
/// let products = InMemoryProducts::new();
/// let created = products.create(&request).await?;
/// assert!(products.get_by_id(created.id).await?.is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryProducts {
    table: Arc<RwLock<Table>>,
}

impl InMemoryProducts {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Repository for InMemoryProducts {
    type CreateRequest = ProductCreateDBRequest;
    type UpdateRequest = ProductUpdateDBRequest;
    type Response = ProductDBResponse;
    type Id = ProductId;
    type Filter = ProductFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut table = self.table.write();
        let id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| DbError::Other(anyhow!("product id sequence exhausted")))?;

        let now = Utc::now();
        let product = Product {
            id,
            name: request.name.clone(),
            price: request.price,
            description: request.description.clone(),
            category: request.category.clone(),
            created_at: now,
            updated_at: now,
        };

        table.last_id = id;
        table.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let table = self.table.read();
        let matching = table.rows.values().filter(|p| filter.matches(p));

        let products = match filter {
            ProductFilter::Page { skip, limit } => {
                // Offsets past the end of the table simply yield an empty page
                let skip = usize::try_from(*skip).unwrap_or(usize::MAX);
                let limit = usize::try_from(*limit).unwrap_or(usize::MAX);
                matching.skip(skip).take(limit).cloned().collect()
            }
            ProductFilter::SortedByPrice { order } => {
                let mut products: Vec<Product> = matching.cloned().collect();
                // Stable sort keeps id order between equal prices
                products.sort_by(|a, b| match order {
                    SortOrder::Asc => a.price.total_cmp(&b.price),
                    SortOrder::Desc => b.price.total_cmp(&a.price),
                });
                products
            }
            ProductFilter::Matching { .. } => matching.cloned().collect(),
        };

        Ok(products)
    }

    async fn delete(&self, id: Self::Id) -> Result<bool> {
        Ok(self.table.write().rows.remove(&id).is_some())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Option<Self::Response>> {
        let mut table = self.table.write();
        let Some(product) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        request.apply_to(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }
}
