//! `storefront-core`: shared building blocks for the storefront crates.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the entity
//! trait, and the domain error model.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AttributeId, BrandId, CategoryId, CountryId, ProductId};
