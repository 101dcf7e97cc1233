//! Database repository for products.

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::products::{Product, ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest},
    },
    types::{ProductId, SortOrder},
};
use sqlx::PgPool;
use tracing::instrument;

/// Filter for listing products.
///
/// Each variant corresponds to one query shape; the API layer picks the variant and the
/// repository turns it into a single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// One page of products in id order
    Page { skip: i64, limit: i64 },
    /// Every product, ordered by price (ties broken by id)
    SortedByPrice { order: SortOrder },
    /// Products whose id equals `id` or whose name contains `name_contains`, in id order
    Matching { id: Option<ProductId>, name_contains: String },
}

impl ProductFilter {
    pub fn page(skip: i64, limit: i64) -> Self {
        Self::Page { skip, limit }
    }

    pub fn sorted_by_price(order: SortOrder) -> Self {
        Self::SortedByPrice { order }
    }

    /// Build a search filter from free text. The id arm only applies when the text is an integer.
    pub fn matching(query: &str) -> Self {
        Self::Matching {
            id: query.parse::<ProductId>().ok(),
            name_contains: query.to_string(),
        }
    }

    /// Whether a row satisfies this filter (ordering and paging aside).
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Page { .. } | ProductFilter::SortedByPrice { .. } => true,
            ProductFilter::Matching { id, name_contains } => {
                *id == Some(product.id) || product.name.contains(name_contains.as_str())
            }
        }
    }
}

/// Escape LIKE metacharacters so the search text matches itself as a plain substring.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// PostgreSQL-backed product repository.
#[derive(Clone)]
pub struct Products {
    db: PgPool,
}

impl Products {
    /// Create a new Products repository instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Products {
    type CreateRequest = ProductCreateDBRequest;
    type UpdateRequest = ProductUpdateDBRequest;
    type Response = ProductDBResponse;
    type Id = ProductId;
    type Filter = ProductFilter;

    #[instrument(skip(self, request), fields(name = %request.name, category = %request.category), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, description, category, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(request.price)
        .bind(&request.description)
        .bind(&request.category)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, category, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let products = match filter {
            ProductFilter::Page { skip, limit } => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price, description, category, created_at, updated_at
                    FROM products
                    ORDER BY id ASC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(*limit)
                .bind(*skip)
                .fetch_all(&self.db)
                .await?
            }
            ProductFilter::SortedByPrice { order } => {
                let query = match order {
                    SortOrder::Asc => {
                        r#"
                        SELECT id, name, price, description, category, created_at, updated_at
                        FROM products
                        ORDER BY price ASC, id ASC
                        "#
                    }
                    SortOrder::Desc => {
                        r#"
                        SELECT id, name, price, description, category, created_at, updated_at
                        FROM products
                        ORDER BY price DESC, id ASC
                        "#
                    }
                };
                sqlx::query_as::<_, Product>(query).fetch_all(&self.db).await?
            }
            ProductFilter::Matching { id, name_contains } => {
                // A NULL id never compares equal, so non-numeric searches only hit the name arm
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price, description, category, created_at, updated_at
                    FROM products
                    WHERE id = $1 OR name LIKE $2
                    ORDER BY id ASC
                    "#,
                )
                .bind(*id)
                .bind(contains_pattern(name_contains))
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(products)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Option<Self::Response>> {
        // $4 distinguishes "leave description alone" from "set description to NULL"
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category = COALESCE($6, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, description, category, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.price)
        .bind(request.description.is_some())
        .bind(request.description.clone().flatten())
        .bind(&request.category)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }
}
