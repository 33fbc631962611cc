use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::Response,
};

use storefront_client::{ListingQuery, load_archive, load_category_archive};

use crate::app::{AppState, dto::ArchiveResponse, errors};

/// GET /archive?category&q&sort&page&limit&view&filter[..]&min[..]&max[..]&inStock
pub async fn archive(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let query = ListingQuery::from_pairs(params);
    let outcome = load_archive(state.api.as_ref(), &state.config, &query).await;
    errors::page_response(
        outcome.map(|page| ArchiveResponse::build(page, &state.schema, &state.config.api_url)),
    )
}

/// GET /archive/{category} - Category archive; unknown categories are 404
pub async fn category_archive(
    Extension(state): Extension<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let query = ListingQuery::from_pairs(params);
    let outcome = load_category_archive(state.api.as_ref(), &state.config, &category, &query).await;
    errors::page_response(
        outcome.map(|page| ArchiveResponse::build(page, &state.schema, &state.config.api_url)),
    )
}
