//! OpenAPI documentation for the product API.
//!
//! The generated document is served at `/api-docs/openapi.json` and rendered with Scalar at
//! `/docs`. Paths are relative to the configured API base path, which is advertised as the
//! single server entry.

use utoipa::OpenApi;
use utoipa::openapi::server::Server;

use crate::api;
use crate::errors::ErrorResponse;
use crate::types::SortOrder;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        description = "Create, browse, search and maintain a catalog of products."
    ),
    servers(
        (url = "/api", description = "Product API server")
    ),
    paths(
        api::handlers::products::create_product,
        api::handlers::products::list_products,
        api::handlers::products::search_products,
        api::handlers::products::sorted_products,
        api::handlers::products::get_product,
        api::handlers::products::update_product,
        api::handlers::products::delete_product,
    ),
    components(
        schemas(
            api::models::products::ProductCreate,
            api::models::products::ProductUpdate,
            api::models::products::ProductResponse,
            ErrorResponse,
            SortOrder,
        )
    ),
    tags(
        (name = "products", description = "Product catalog management")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Build the document with its server entry pointing at `base_path`.
    pub fn for_base_path(base_path: &str) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        doc.servers = Some(vec![Server::new(base_path)]);
        doc
    }
}
