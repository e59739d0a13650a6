//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Catalog
//! GET  /api/products           - Product list as JSON (?category=)
//! GET  /api/products/search    - Search suggestions (?q=&category=)
//! GET  /api/categories         - Category filter chips
//! GET  /api/currencies         - Currency panel (?currency=)
//! GET  /products/grid          - Product grid fragment (?category=&currency=)
//!
//! # Static site (fallback)
//! GET  /*                      - Pages, scripts, styles, images
//! ```

pub mod currency;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/grid", get(products::grid))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/search", get(products::search))
        .route("/categories", get(products::categories))
        .route("/currencies", get(currency::options))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/api", api_routes())
}
