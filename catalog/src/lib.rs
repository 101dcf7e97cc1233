//! # catalog: product catalog service
//!
//! `catalog` is an HTTP service for maintaining a catalog of products. Each product has a
//! name, a price, an optional description and a category. Clients can create, page through,
//! search, sort by price, fetch, partially update and delete products.
//!
//! ## Architecture
//!
//! The service is built on [Axum](https://github.com/tokio-rs/axum) and stores products in
//! PostgreSQL through [SQLx](https://github.com/launchbadge/sqlx). An in-memory backend with the
//! same [`db::handlers::Repository`] interface can be selected for local development and tests.
//!
//! A request flows through three layers:
//!
//! - **Routing** ([`build_router`]): maps method and path to a handler, nothing else
//! - **Validation** ([`api`]): parses path and query values and checks bodies against an explicit
//!   input schema, failing fast with a single message
//! - **Persistence** ([`db`]): one storage statement per operation, no validation
//!
//! Failures are classified by [`errors::Error`] and rendered as `{"error": "..."}` with a 400,
//! 404 or 500 status.
//!
//! ## Startup
//!
//! [`Application::new`] connects to the configured database and creates the `products` table
//! (via the migrator) before any listener is bound. [`Application::serve`] then accepts
//! connections until the shutdown future resolves.
//!
//! ```no_run
//! use catalog::{Application, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! Application::new(config).await?.serve(async { let _ = tokio::signal::ctrl_c().await; }).await
//! # }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod types;

use crate::{
    config::DatabaseConfig,
    db::handlers::{InMemoryProducts, ProductRepository, Products},
    openapi::ApiDoc,
};
use axum::{Router, routing::get};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info};
use utoipa_scalar::{Scalar, Servable};

pub use types::ProductId;

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .products(Arc::new(InMemoryProducts::new()))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    /// Product storage, either PostgreSQL or in-memory
    pub products: Arc<ProductRepository>,
    pub config: Config,
}

/// Get the catalog database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the configured database and make sure the `products` table exists.
///
/// Returns the pool (if any) alongside the repository so that it can be closed on shutdown.
async fn setup_database(config: &Config) -> anyhow::Result<(Option<PgPool>, Arc<ProductRepository>)> {
    match &config.database {
        DatabaseConfig::External { url, pool } => {
            info!("Using external database");
            let pool = PgPoolOptions::new()
                .max_connections(pool.max_connections)
                .min_connections(pool.min_connections)
                .acquire_timeout(pool.acquire_timeout())
                .idle_timeout(pool.idle_timeout())
                .max_lifetime(pool.max_lifetime())
                .connect(url)
                .await?;

            migrator().run(&pool).await?;
            info!("Database schema is up to date");

            let products: Arc<ProductRepository> = Arc::new(Products::new(pool.clone()));
            Ok((Some(pool), products))
        }
        DatabaseConfig::Memory => {
            info!("Using in-memory product storage; products will be lost on shutdown");
            let products: Arc<ProductRepository> = Arc::new(InMemoryProducts::new());
            Ok((None, products))
        }
    }
}

/// Build the product API routes, without a base path.
fn product_routes() -> Router<AppState> {
    use api::handlers::products;

    Router::new()
        .route("/products", get(products::list_products).post(products::create_product))
        .route("/products/search/{query}", get(products::search_products))
        .route("/products/sorted", get(products::sorted_products))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let mount_path = state.config.mount_path().to_string();
    let api_routes = product_routes().with_state(state.clone());

    let router = Router::new().route("/healthz", get(|| async { "OK" }));
    let router = if mount_path.is_empty() {
        router.merge(api_routes)
    } else {
        router.nest(&mount_path, api_routes)
    };

    let base_path = if mount_path.is_empty() { "/" } else { mount_path.as_str() };
    let mut router = router
        .merge(Scalar::with_url("/docs", ApiDoc::for_base_path(base_path)))
        .route(
            "/api-docs/openapi.json",
            get({
                let doc = ApiDoc::for_base_path(base_path);
                move || {
                    let doc = doc.clone();
                    async move { axum::Json(doc) }
                }
            }),
        )
        .layer(CorsLayer::permissive());

    // Add Prometheus metrics if enabled
    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Main application struct that owns the router and the storage resources.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to storage and initializes the schema
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, in-flight requests finish and the
///    database pool is closed
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting catalog with configuration: {:#?}", config);

        let (pool, products) = setup_database(&config).await?;

        let app_state = AppState::builder().products(products).config(config.clone()).build();
        let router = build_router(app_state);

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Catalog listening on http://{}, available at http://localhost:{}{}",
            bind_addr,
            self.config.port,
            self.config.mount_path()
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
