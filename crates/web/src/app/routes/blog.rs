use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
};

use storefront_client::load_blog;

use crate::app::{AppState, errors};

/// GET /blog/{slug}
pub async fn blog(Extension(state): Extension<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    errors::page_response(load_blog(state.api.as_ref(), &state.config, &slug).await)
}
