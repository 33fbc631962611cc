//! `storefront-client`
//!
//! **Responsibility:** talk to the remote catalog/content API and turn its
//! responses into page models.
//!
//! This crate provides:
//! - Environment-driven configuration
//! - The `CatalogApi` seam and its reqwest implementation
//! - Listing query serialization (search, category, sort, active filters)
//! - The incremental page loader (one request in flight, stale results dropped)
//! - Page loaders for the archive, blog, product and home pages
//!
//! The remote API stays the authority; nothing here persists data.

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod loader;
pub mod pages;
pub mod query;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{CatalogApi, HttpCatalogClient};
pub use archive::ArchiveController;
pub use config::{ConfigError, StorefrontConfig};
pub use error::{ApiError, ApiResult};
pub use loader::{LoadError, LoadOutcome, LoadPhase, LoaderSnapshot, PagedLoader};
pub use pages::{
    ArchivePage, BlogPage, FALLBACK_TITLE, HomePage, NO_BRANDS, NO_RESULTS, PageMetadata,
    PageOutcome, ProductDetail, load_archive, load_blog, load_category_archive, load_home,
    load_product,
};
pub use query::{FilterParams, ListingQuery};
