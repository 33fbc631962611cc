//! HTTP surface of the storefront: page models as JSON, redirects and 404s
//! decided by the page loaders.

pub mod app;
