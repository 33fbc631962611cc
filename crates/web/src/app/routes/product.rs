use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
};

use storefront_client::load_product;
use storefront_core::ProductId;

use crate::app::{AppState, dto::ProductResponse, errors};

/// GET /product/{id} - Detail page with gallery
pub async fn product(Extension(state): Extension<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::not_found();
    };
    let outcome = load_product(state.api.as_ref(), &state.config, &id).await;
    errors::page_response(outcome.map(ProductResponse::from))
}
