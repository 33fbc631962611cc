use axum::{Router, routing::get};

pub mod archive;
pub mod blog;
pub mod home;
pub mod product;
pub mod system;

/// Router for every page.
pub fn router() -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/archive", get(archive::archive))
        .route("/archive/:category", get(archive::category_archive))
        .route("/blog/:slug", get(blog::blog))
        .route("/product/:id", get(product::product))
}
