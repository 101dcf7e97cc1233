//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures and input validation
//!
//! # API Structure
//!
//! All product routes live under the configured base path (`/api` by default):
//!
//! - `POST /products`, `GET /products?page=&limit=`
//! - `GET /products/search/{query}`, `GET /products/sorted?order=asc|desc`
//! - `GET /products/{id}`, `PUT /products/{id}`, `DELETE /products/{id}`
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with `utoipa`. The rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
