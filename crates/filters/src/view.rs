//! Filtered view computer.

use std::sync::Arc;

use storefront_catalog::Product;

use crate::attribute::Attribute;
use crate::selection::{FilterSelection, Selection};

/// The visible subset of a product collection.
///
/// Holds positions into the shared collection rather than copies, so it always
/// preserves the collection's order.
#[derive(Debug, Clone)]
pub struct FilteredView {
    source: Arc<Vec<Product>>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the visible products within the source collection.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.indices.iter().map(|&i| &self.source[i])
    }

    pub fn to_vec(&self) -> Vec<Product> {
        self.iter().cloned().collect()
    }

    /// Whether this view was computed from `products` (same allocation).
    pub fn is_over(&self, products: &Arc<Vec<Product>>) -> bool {
        Arc::ptr_eq(&self.source, products)
    }
}

/// Compute the filtered view of `products` under `selection`.
pub fn compute(
    products: &Arc<Vec<Product>>,
    attributes: &[Attribute],
    selection: &FilterSelection,
) -> FilteredView {
    let predicate = Predicate::new(attributes, selection);
    let indices = products
        .iter()
        .enumerate()
        .filter(|(_, p)| predicate.matches(p))
        .map(|(i, _)| i)
        .collect();

    FilteredView {
        source: Arc::clone(products),
        indices,
    }
}

/// Borrowing variant of [`compute`] for callers holding a plain slice.
pub fn filter_products<'a>(
    products: &'a [Product],
    attributes: &[Attribute],
    selection: &FilterSelection,
) -> Vec<&'a Product> {
    let predicate = Predicate::new(attributes, selection);
    products.iter().filter(|p| predicate.matches(p)).collect()
}

struct Predicate<'a> {
    clauses: Vec<(&'a Attribute, &'a Selection)>,
    in_stock_only: bool,
}

impl<'a> Predicate<'a> {
    fn new(attributes: &'a [Attribute], selection: &'a FilterSelection) -> Self {
        let clauses = attributes
            .iter()
            .filter(|a| selection.is_effective(a))
            .filter_map(|a| selection.get(&a.id).map(|s| (a, s)))
            .collect();

        Self {
            clauses,
            in_stock_only: selection.in_stock_only(),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if self.in_stock_only && !product.is_available() {
            return false;
        }

        self.clauses.iter().all(|(attribute, selection)| match selection {
            Selection::Options(checked) => attribute
                .source
                .text(product)
                .is_some_and(|v| checked.contains(&v)),
            Selection::Range(range) => attribute
                .source
                .number(product)
                .is_some_and(|n| range.contains(n)),
        })
    }
}
