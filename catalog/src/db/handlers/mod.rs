//! Repository implementations for database access.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Provides strongly-typed CRUD operations behind the [`Repository`] trait
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//! - Leaves all field validation to the API layer
//!
//! # Available Repositories
//!
//! - [`Products`]: PostgreSQL-backed product storage
//! - [`InMemoryProducts`]: process-local product storage for tests and local development
//!
//! Request handlers only see [`ProductRepository`], so either backend can sit behind the API:
//!
//! ```ignore
//! use catalog::db::handlers::{ProductFilter, ProductRepository, Products, Repository};
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let repo: std::sync::Arc<ProductRepository> = std::sync::Arc::new(Products::new(pool));
//!     let page = repo.list(&ProductFilter::page(0, 10)).await?;
//!     Ok(())
//! }
//! ```

pub mod in_memory;
pub mod products;
pub mod repository;

pub use in_memory::InMemoryProducts;
pub use products::{ProductFilter, Products};
pub use repository::Repository;

use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::types::ProductId;

/// The product storage capability handed to request handlers.
pub type ProductRepository = dyn Repository<
        CreateRequest = ProductCreateDBRequest,
        UpdateRequest = ProductUpdateDBRequest,
        Response = ProductDBResponse,
        Id = ProductId,
        Filter = ProductFilter,
    >;
