use std::sync::Arc;

use axum::{extract::Extension, response::Response};

use storefront_client::load_home;

use crate::app::{AppState, errors};

/// GET / - Brand strip, banners and menus
pub async fn home(Extension(state): Extension<Arc<AppState>>) -> Response {
    errors::page_response(load_home(state.api.as_ref(), &state.config).await)
}
