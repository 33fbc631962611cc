//! Attribute facet extraction.
//!
//! Extraction is a pure function of the product collection. Visibility of
//! dependent attributes is decided later against the selection, never here.

use std::collections::BTreeMap;
use std::sync::Arc;

use storefront_catalog::Product;

use crate::attribute::{Attribute, AttributeKind, FacetKind, FacetSchema, OptionCount};

/// Derive one attribute per schema definition, in schema order.
///
/// Attributes with no values (or a single-point range) are still emitted so the
/// presentation layer can decide to hide them.
pub fn extract(schema: &FacetSchema, products: &[Product]) -> Vec<Attribute> {
    schema
        .definitions()
        .iter()
        .map(|def| {
            let kind = match def.kind {
                FacetKind::String => {
                    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
                    for value in products.iter().filter_map(|p| def.source.text(p)) {
                        *counts.entry(value).or_default() += 1;
                    }
                    AttributeKind::String {
                        options: counts
                            .into_iter()
                            .map(|(value, count)| OptionCount { value, count })
                            .collect(),
                    }
                }
                FacetKind::Number { step } => {
                    let observed = products
                        .iter()
                        .filter_map(|p| def.source.number(p))
                        .fold(None, |acc: Option<(i64, i64)>, n| match acc {
                            None => Some((n, n)),
                            Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
                        });
                    let (min, max) = observed.unwrap_or((0, 0));
                    AttributeKind::Number { min, max, step }
                }
            };

            Attribute {
                id: def.id.clone(),
                title: def.title.clone(),
                required_attribute: def.required_attribute.clone(),
                source: def.source.clone(),
                kind,
            }
        })
        .collect()
}

/// Memoizes [`extract`] on collection identity.
///
/// The cache holds a clone of the collection `Arc`, so the identity it compares
/// against cannot be freed and reused while cached.
#[derive(Debug, Clone)]
pub struct FacetCache {
    schema: FacetSchema,
    cached: Option<(Arc<Vec<Product>>, Arc<[Attribute]>)>,
}

impl FacetCache {
    pub fn new(schema: FacetSchema) -> Self {
        Self {
            schema,
            cached: None,
        }
    }

    pub fn schema(&self) -> &FacetSchema {
        &self.schema
    }

    /// Attributes for `products`, recomputed only when the collection changed.
    pub fn attributes(&mut self, products: &Arc<Vec<Product>>) -> Arc<[Attribute]> {
        if let Some((source, attributes)) = &self.cached {
            if Arc::ptr_eq(source, products) {
                tracing::debug!("facet cache hit");
                return Arc::clone(attributes);
            }
        }

        let attributes: Arc<[Attribute]> = extract(&self.schema, products).into();
        tracing::debug!(
            products = products.len(),
            attributes = attributes.len(),
            "facets recomputed"
        );
        self.cached = Some((Arc::clone(products), Arc::clone(&attributes)));
        attributes
    }
}
