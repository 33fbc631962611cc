//! Axum router and shared state.
//!
//! - `routes/`: one file per page
//! - `dto.rs`: response shapes layered on top of the page models
//! - `errors.rs`: consistent error and page-outcome responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use storefront_client::{CatalogApi, StorefrontConfig};
use storefront_filters::FacetSchema;

pub mod dto;
pub mod errors;
pub mod routes;

/// Everything a handler needs. Shared read-only across requests.
pub struct AppState {
    pub api: Arc<dyn CatalogApi>,
    pub config: StorefrontConfig,
    pub schema: FacetSchema,
}

impl AppState {
    pub fn new(api: Arc<dyn CatalogApi>, config: StorefrontConfig) -> Self {
        Self {
            api,
            config,
            schema: FacetSchema::storefront_default(),
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(state))))
}
