use crate::AppState;
use crate::api::models::products::{
    INVALID_BODY, INVALID_ORDER, INVALID_PAGINATION, INVALID_PRODUCT_ID, ListProductsQuery, NO_PRODUCTS_FOUND, PRODUCT_NOT_FOUND,
    ProductCreate, ProductResponse, ProductUpdate, SortedProductsQuery, parse_product_id,
};
use crate::db::handlers::ProductFilter;
use crate::db::models::products::{Product, ProductCreateDBRequest, ProductUpdateDBRequest};
use crate::errors::{Error, ErrorResponse, Result};
use crate::types::ProductId;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::Value;

/// Path segments that don't decode to UTF-8 can't name a product.
fn product_id(path: std::result::Result<Path<String>, PathRejection>) -> Result<ProductId> {
    let Path(raw) = path.map_err(|_| Error::bad_request(INVALID_PRODUCT_ID))?;
    parse_product_id(&raw)
}

fn into_responses(products: Vec<Product>) -> Json<Vec<ProductResponse>> {
    Json(products.into_iter().map(ProductResponse::from).collect())
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    summary = "Create product",
    request_body = ProductCreate,
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let Json(body) = body.map_err(|_| Error::bad_request(INVALID_BODY))?;
    let request = ProductCreateDBRequest::from(ProductCreate::from_body(body)?);

    let product = state.products.create(&request).await.map_err(Error::storage("create product"))?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    summary = "List products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "One page of products ordered by id", body = Vec<ProductResponse>),
        (status = 400, description = "Invalid page or limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>> {
    let Query(query) = query.map_err(|_| Error::bad_request(INVALID_PAGINATION))?;
    let filter = query.filter()?;

    let products = state.products.list(&filter).await.map_err(Error::storage("fetch products"))?;
    Ok(into_responses(products))
}

#[utoipa::path(
    get,
    path = "/products/search/{query}",
    tag = "products",
    summary = "Search products",
    description = "Matches products whose id equals the query, or whose name contains it.",
    params(
        ("query" = String, Path, description = "Product id or name fragment")
    ),
    responses(
        (status = 200, description = "Matching products ordered by id", body = Vec<ProductResponse>),
        (status = 404, description = "No products found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn search_products(
    State(state): State<AppState>,
    query: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ProductResponse>>> {
    // No stored name can contain text that isn't valid UTF-8
    let Path(query) = query.map_err(|_| Error::not_found(NO_PRODUCTS_FOUND))?;
    let filter = ProductFilter::matching(&query);

    let products = state.products.list(&filter).await.map_err(Error::storage("fetch products"))?;
    if products.is_empty() {
        return Err(Error::not_found(NO_PRODUCTS_FOUND));
    }
    Ok(into_responses(products))
}

#[utoipa::path(
    get,
    path = "/products/sorted",
    tag = "products",
    summary = "List products sorted by price",
    params(SortedProductsQuery),
    responses(
        (status = 200, description = "All products ordered by price", body = Vec<ProductResponse>),
        (status = 400, description = "Invalid order", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn sorted_products(
    State(state): State<AppState>,
    query: std::result::Result<Query<SortedProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>> {
    let Query(query) = query.map_err(|_| Error::bad_request(INVALID_ORDER))?;
    let filter = query.filter()?;

    let products = state.products.list(&filter).await.map_err(Error::storage("fetch products"))?;
    Ok(into_responses(products))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    summary = "Get product",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_product(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<ProductResponse>> {
    let id = product_id(id)?;

    match state.products.get_by_id(id).await.map_err(Error::storage("fetch product"))? {
        Some(product) => Ok(Json(ProductResponse::from(product))),
        None => Err(Error::not_found(PRODUCT_NOT_FOUND)),
    }
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    summary = "Update product",
    description = "Only the supplied fields change. An explicit null description clears it.",
    request_body = ProductUpdate,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product updated successfully", body = ProductResponse),
        (status = 400, description = "Invalid product ID or request body", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_product(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductResponse>> {
    let id = product_id(id)?;
    let Json(body) = body.map_err(|_| Error::bad_request(INVALID_BODY))?;
    let request = ProductUpdateDBRequest::from(ProductUpdate::from_body(body)?);

    match state.products.update(id, &request).await.map_err(Error::storage("update product"))? {
        Some(product) => Ok(Json(ProductResponse::from(product))),
        None => Err(Error::not_found(PRODUCT_NOT_FOUND)),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    summary = "Delete product",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_product(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<StatusCode> {
    let id = product_id(id)?;

    if state.products.delete(id).await.map_err(Error::storage("delete product"))? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found(PRODUCT_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::models::products::ProductResponse;
    use crate::errors::ErrorResponse;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    #[test_log::test]
    async fn test_create_product_assigns_distinct_ids() {
        let app = create_test_app().await;

        let first = create_test_product(&app, "Laptop", 999.99).await;
        let second = create_test_product(&app, "Laptop", 999.99).await;

        assert_ne!(first.id, second.id);
        assert_eq!(first.name, "Laptop");
        assert_eq!(first.price, 999.99);
        assert_eq!(first.category, "test");
        assert_eq!(first.description, None);
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_create_product_returns_created_record() {
        let app = create_test_app().await;

        let response = app
            .post("/api/products")
            .json(&json!({
                "name": "Desk lamp",
                "price": 0,
                "description": "Warm white",
                "category": "lighting",
                "sku": "ignored"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let product: ProductResponse = response.json();
        assert_eq!(product.name, "Desk lamp");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.description.as_deref(), Some("Warm white"));
        assert_eq!(product.category, "lighting");
        assert_eq!(product.created_at, product.updated_at);
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_create_product_validation_messages() {
        let app = create_test_app().await;

        let cases = [
            (json!({"price": 10, "category": "c"}), "Name is required and must be a string."),
            (json!({"name": "n", "category": "c"}), "Price is required and must be a number."),
            (json!({"name": "n", "price": "10", "category": "c"}), "Price is required and must be a number."),
            (json!({"name": "n", "price": 10}), "Category is required and must be a string."),
            (json!({"name": "n", "price": 10, "category": ""}), "Category is required and must be a string."),
            (json!({"name": "n", "price": 10, "description": 3, "category": "c"}), "Description must be a string."),
            (json!([1, 2, 3]), "Request body must be a JSON object."),
        ];

        for (body, message) in cases {
            let response = app.post("/api/products").json(&body).await;
            response.assert_status_bad_request();
            let error: ErrorResponse = response.json();
            assert_eq!(error.error, message, "body {body}");
        }

        let response = app.post("/api/products").text("name=Laptop").await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Request body must be a JSON object.");

        // Nothing was stored along the way
        let response = app.get("/api/products").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert!(products.is_empty());
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_list_products_with_pagination() {
        let app = create_test_app().await;
        for i in 0..25 {
            create_test_product(&app, &format!("Product {i}"), i as f64).await;
        }

        // Default page and limit
        let response = app.get("/api/products").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert_eq!(products.len(), 10);
        assert_eq!(products[0].name, "Product 0");

        // Second page starts at the 11th record
        let response = app.get("/api/products?page=2&limit=10").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert_eq!(products.len(), 10);
        assert_eq!(products[0].name, "Product 10");
        assert!(products.windows(2).all(|w| w[0].id < w[1].id));

        // Last partial page
        let response = app.get("/api/products?page=3&limit=10").await;
        let products: Vec<ProductResponse> = response.json();
        assert_eq!(products.len(), 5);

        // Past the end
        let response = app.get("/api/products?page=100&limit=10").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert!(products.is_empty());
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_list_products_rejects_invalid_pagination() {
        let app = create_test_app().await;

        for query in ["page=0", "limit=0", "page=-1", "page=abc", "limit=2.5", "page=9223372036854775807&limit=9"] {
            let response = app.get(&format!("/api/products?{query}")).await;
            response.assert_status_bad_request();
            let error: ErrorResponse = response.json();
            assert_eq!(error.error, "Page and limit must be positive integers.", "query {query}");
        }
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_search_products_by_id_and_name() {
        let app = create_test_app().await;
        let laptop = create_test_product(&app, "Laptop Pro", 1500.0).await;
        let stand = create_test_product(&app, "Laptop stand", 40.0).await;
        create_test_product(&app, "Mouse", 25.0).await;

        let response = app.get("/api/products/search/Laptop").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![laptop.id, stand.id]);

        let response = app.get(&format!("/api/products/search/{}", stand.id)).await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert!(products.iter().any(|p| p.id == stand.id));

        // Case-sensitive substring match
        let response = app.get("/api/products/search/laptop").await;
        response.assert_status_not_found();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "No products found");
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_search_products_treats_wildcards_literally() {
        let app = create_test_app().await;
        create_test_product(&app, "Widget", 1.0).await;
        let discounted = create_test_product(&app, "50% off", 2.0).await;

        let response = app.get("/api/products/search/%25").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, discounted.id);

        let response = app.get("/api/products/search/_").await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_sorted_products() {
        let app = create_test_app().await;
        for (name, price) in [("b", 20.0), ("a", 5.0), ("c", 12.5), ("d", 5.0)] {
            create_test_product(&app, name, price).await;
        }

        let response = app.get("/api/products/sorted").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "d", "c", "b"]);

        let response = app.get("/api/products/sorted?order=desc").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert_eq!(products.len(), 4);
        assert!(products.windows(2).all(|w| w[0].price >= w[1].price));

        let response = app.get("/api/products/sorted?order=xyz").await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Order must be either \"asc\" or \"desc\".");

        let response = app.get("/api/products/sorted?order=DESC").await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_get_product() {
        let app = create_test_app().await;
        let product = create_test_product(&app, "Keyboard", 80.0).await;

        let response = app.get(&format!("/api/products/{}", product.id)).await;
        response.assert_status_ok();
        let fetched: ProductResponse = response.json();
        assert_eq!(fetched, product);

        let response = app.get("/api/products/abc").await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid product ID.");

        let response = app.get("/api/products/99999").await;
        response.assert_status_not_found();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Product not found");
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_update_product_changes_only_supplied_fields() {
        let app = create_test_app().await;
        let created = app
            .post("/api/products")
            .json(&json!({"name": "Chair", "price": 120, "description": "Oak", "category": "furniture"}))
            .await
            .json::<ProductResponse>();

        let response = app.put(&format!("/api/products/{}", created.id)).json(&json!({"price": 95.5})).await;
        response.assert_status_ok();
        let updated: ProductResponse = response.json();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price, 95.5);
        assert_eq!(updated.name, "Chair");
        assert_eq!(updated.description.as_deref(), Some("Oak"));
        assert_eq!(updated.category, "furniture");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        // Explicit null clears the description
        let response = app
            .put(&format!("/api/products/{}", created.id))
            .json(&json!({"description": null}))
            .await;
        response.assert_status_ok();
        let updated: ProductResponse = response.json();
        assert_eq!(updated.description, None);
        assert_eq!(updated.price, 95.5);

        // The stored record reflects the update
        let fetched: ProductResponse = app.get(&format!("/api/products/{}", created.id)).await.json();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_update_product_errors() {
        let app = create_test_app().await;
        let product = create_test_product(&app, "Chair", 120.0).await;

        let response = app.put(&format!("/api/products/{}", product.id)).json(&json!({"price": "cheap"})).await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Price must be a number.");

        let response = app.put(&format!("/api/products/{}", product.id)).json(&json!({"name": null})).await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Name must be a string.");

        // The id is checked before the body
        let response = app.put("/api/products/abc").json(&json!({"price": "cheap"})).await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid product ID.");

        let response = app.put("/api/products/4242").json(&json!({"price": 1})).await;
        response.assert_status_not_found();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Product not found");

        // Failed updates leave the record untouched
        let fetched: ProductResponse = app.get(&format!("/api/products/{}", product.id)).await.json();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_delete_product_twice() {
        let app = create_test_app().await;
        let product = create_test_product(&app, "Monitor", 300.0).await;

        let response = app.delete(&format!("/api/products/{}", product.id)).await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());

        let response = app.delete(&format!("/api/products/{}", product.id)).await;
        response.assert_status_not_found();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Product not found");

        let response = app.get(&format!("/api/products/{}", product.id)).await;
        response.assert_status_not_found();

        let response = app.delete("/api/products/1.5").await;
        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid product ID.");
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_undecodable_path_segments_get_json_errors() {
        let app = create_test_app().await;
        create_test_product(&app, "Widget", 1.0).await;

        for response in [
            app.get("/api/products/%FF").await,
            app.put("/api/products/%FF").json(&json!({"price": 1})).await,
            app.delete("/api/products/%FF").await,
        ] {
            response.assert_status_bad_request();
            let error: ErrorResponse = response.json();
            assert_eq!(error.error, "Invalid product ID.");
        }

        let response = app.get("/api/products/search/%FF").await;
        response.assert_status_not_found();
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "No products found");
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_ids_are_not_reused_after_delete() {
        let app = create_test_app().await;
        let first = create_test_product(&app, "First", 1.0).await;
        app.delete(&format!("/api/products/{}", first.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let second = create_test_product(&app, "Second", 2.0).await;
        assert!(second.id > first.id);
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_storage_failures_return_fixed_messages() {
        let app = create_failing_test_app();

        let cases = [
            (app.post("/api/products").json(&json!({"name": "n", "price": 1, "category": "c"})).await, "Failed to create product"),
            (app.get("/api/products").await, "Failed to fetch products"),
            (app.get("/api/products/search/n").await, "Failed to fetch products"),
            (app.get("/api/products/sorted").await, "Failed to fetch products"),
            (app.get("/api/products/1").await, "Failed to fetch product"),
            (app.put("/api/products/1").json(&json!({"price": 2})).await, "Failed to update product"),
            (app.delete("/api/products/1").await, "Failed to delete product"),
        ];

        for (response, message) in cases {
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            let error: ErrorResponse = response.json();
            assert_eq!(error.error, message);
        }
    }

    #[tokio::test]
    #[test_log::test]
    async fn test_validation_runs_before_storage() {
        let app = create_failing_test_app();

        let response = app.post("/api/products").json(&json!({"name": "n"})).await;
        response.assert_status_bad_request();

        let response = app.get("/api/products?page=0").await;
        response.assert_status_bad_request();

        let response = app.get("/api/products/sorted?order=up").await;
        response.assert_status_bad_request();

        let response = app.delete("/api/products/x").await;
        response.assert_status_bad_request();
    }
}
