//! Paged product listings (`GET /product`, `POST /product`).

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// One page of products. Totals are authoritative from the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub docs: Vec<Product>,
    #[serde(default)]
    pub total_docs: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl ProductPage {
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Raw `/product` response: paged envelope, or the legacy flat array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductListing {
    Paged(ProductPage),
    Flat(Vec<Product>),
}

impl ProductListing {
    /// Normalize to a page. A flat array is a single page holding everything.
    pub fn into_page(self) -> ProductPage {
        match self {
            ProductListing::Paged(page) => page,
            ProductListing::Flat(docs) => ProductPage {
                total_docs: docs.len() as u64,
                total_pages: if docs.is_empty() { 0 } else { 1 },
                docs,
            },
        }
    }
}
