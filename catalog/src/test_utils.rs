//! Test utilities for handler and application tests.

use crate::api::models::products::ProductResponse;
use crate::config::{Config, DatabaseConfig};
use crate::db::errors::{DbError, Result};
use crate::db::handlers::{ProductFilter, ProductRepository, Repository};
use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::types::ProductId;
use crate::{AppState, Application, build_router};
use anyhow::anyhow;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        enable_metrics: false,
        enable_otel_export: false,
        ..Default::default()
    }
}

/// Full application backed by a fresh in-memory store, routes under `/api`.
pub async fn create_test_app() -> TestServer {
    create_test_app_with_config(create_test_config()).await
}

pub async fn create_test_app_with_config(config: Config) -> TestServer {
    Application::new(config)
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// Application whose storage fails every call.
pub fn create_failing_test_app() -> TestServer {
    let products: Arc<ProductRepository> = Arc::new(FailingProducts);
    let state = AppState::builder().products(products).config(create_test_config()).build();
    TestServer::new(build_router(state)).expect("Failed to create test server")
}

pub async fn create_test_product(app: &TestServer, name: &str, price: f64) -> ProductResponse {
    let response = app
        .post("/api/products")
        .json(&json!({"name": name, "price": price, "category": "test"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

/// Repository standing in for an unreachable database.
pub struct FailingProducts;

fn unavailable() -> DbError {
    DbError::Other(anyhow!("connection refused"))
}

#[async_trait::async_trait]
impl Repository for FailingProducts {
    type CreateRequest = ProductCreateDBRequest;
    type UpdateRequest = ProductUpdateDBRequest;
    type Response = ProductDBResponse;
    type Id = ProductId;
    type Filter = ProductFilter;

    async fn create(&self, _request: &Self::CreateRequest) -> Result<Self::Response> {
        Err(unavailable())
    }

    async fn get_by_id(&self, _id: Self::Id) -> Result<Option<Self::Response>> {
        Err(unavailable())
    }

    async fn list(&self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        Err(unavailable())
    }

    async fn delete(&self, _id: Self::Id) -> Result<bool> {
        Err(unavailable())
    }

    async fn update(&self, _id: Self::Id, _request: &Self::UpdateRequest) -> Result<Option<Self::Response>> {
        Err(unavailable())
    }
}
