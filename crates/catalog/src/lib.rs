//! Catalog data model (read-only view of the remote commerce/content API).
//!
//! Everything here is owned by the remote API: the storefront deserializes it,
//! reads it, and never mutates it. No IO lives in this crate.

pub mod brand;
pub mod category;
pub mod content;
pub mod listing;
mod lenient;
pub mod product;

pub use brand::{Brand, Country};
pub use category::{find_category, Category, CategoryList, CategoryRef};
pub use content::{Banner, BlogPost, HeaderMenu, Redirect, RedirectKind, RedirectStatus, WebTextPlans};
pub use listing::{ProductListing, ProductPage};
pub use product::{AttributeValue, FieldValue, Product, ProductField};
