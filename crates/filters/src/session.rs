//! Listing session: the explicit, session-scoped state object an archive page
//! hands to its presentation layer.

use std::sync::Arc;

use storefront_catalog::Product;
use storefront_core::AttributeId;

use crate::attribute::{Attribute, FacetSchema, NumericRange};
use crate::facets::FacetCache;
use crate::selection::{FilterSelection, SelectionError};
use crate::ui::ViewState;
use crate::view::{FilteredView, compute};

/// Owns the current product collection, its facets, the filter selection and
/// the view state. The filtered view is computed lazily and memoized on
/// (collection identity, selection revision).
#[derive(Debug)]
pub struct ListingSession {
    products: Arc<Vec<Product>>,
    facets: FacetCache,
    attributes: Arc<[Attribute]>,
    selection: FilterSelection,
    view_state: ViewState,
    cached_view: Option<(u64, Arc<FilteredView>)>,
}

impl ListingSession {
    pub fn new(schema: FacetSchema, products: impl Into<Arc<Vec<Product>>>) -> Self {
        let products = products.into();
        let mut facets = FacetCache::new(schema);
        let attributes = facets.attributes(&products);
        let selection = FilterSelection::new(&attributes);

        Self {
            products,
            facets,
            attributes,
            selection,
            view_state: ViewState::default(),
            cached_view: None,
        }
    }

    /// Replace the product collection (initial fetch, appended page, restart).
    ///
    /// Facets are re-derived only when the collection identity changed, and the
    /// selection adopts the new bounds.
    pub fn set_products(&mut self, products: Arc<Vec<Product>>) {
        if Arc::ptr_eq(&self.products, &products) {
            return;
        }
        self.products = products;
        self.attributes = self.facets.attributes(&self.products);
        self.selection.sync_attributes(&self.attributes);
    }

    pub fn products(&self) -> &Arc<Vec<Product>> {
        &self.products
    }

    /// Every extracted attribute, including hidden dependent ones.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attributes to render: dependent attributes appear only once their
    /// prerequisite has an active selection. Panel indices refer to this list.
    pub fn visible_attributes(&self) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| self.selection.is_visible(a))
            .collect()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Direct access for bulk updates (e.g. replaying URL parameters).
    pub fn selection_mut(&mut self) -> &mut FilterSelection {
        &mut self.selection
    }

    pub fn toggle_option(&mut self, attribute: &AttributeId, value: &str) -> Result<(), SelectionError> {
        self.selection.toggle_option(attribute, value)
    }

    pub fn set_range(
        &mut self,
        attribute: &AttributeId,
        range: NumericRange,
    ) -> Result<NumericRange, SelectionError> {
        self.selection.set_range(attribute, range)
    }

    pub fn set_in_stock_only(&mut self, in_stock_only: bool) {
        self.selection.set_in_stock_only(in_stock_only);
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn toggle_open_panel(&mut self, index: usize) {
        self.selection.toggle_open_panel(index);
    }

    /// Whether visible panel `index` is expanded.
    pub fn is_panel_open(&self, index: usize) -> bool {
        self.visible_attributes()
            .get(index)
            .is_some_and(|a| self.selection.is_panel_open(index, a))
    }

    /// The filtered view, recomputed only if the collection or selection moved.
    pub fn filtered(&mut self) -> Arc<FilteredView> {
        let revision = self.selection.revision();
        if let Some((cached_revision, view)) = &self.cached_view {
            if *cached_revision == revision && view.is_over(&self.products) {
                return Arc::clone(view);
            }
        }

        let view = Arc::new(compute(&self.products, &self.attributes, &self.selection));
        tracing::debug!(
            revision,
            total = self.products.len(),
            visible = view.len(),
            "filtered view recomputed"
        );
        self.cached_view = Some((revision, Arc::clone(&view)));
        view
    }

    pub fn filtered_count(&mut self) -> usize {
        self.filtered().len()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn view_state_mut(&mut self) -> &mut ViewState {
        &mut self.view_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn session() -> ListingSession {
        ListingSession::new(FacetSchema::storefront_default(), fixtures::ten_machines())
    }

    #[test]
    fn filtered_view_is_memoized_until_selection_changes() {
        let mut s = session();
        let a = s.filtered();
        let b = s.filtered();
        assert!(Arc::ptr_eq(&a, &b));

        s.set_in_stock_only(true);
        let c = s.filtered();
        assert!(!Arc::ptr_eq(&b, &c));
        assert_eq!(c.len(), 6);
    }

    #[test]
    fn new_collection_invalidates_view_and_resyncs_bounds() {
        let mut s = session();
        assert_eq!(s.filtered_count(), 10);

        let mut more = s.products().as_ref().clone();
        more.push(fixtures::machine("p10", "A", 2008, true));
        s.set_products(Arc::new(more));

        assert_eq!(s.filtered_count(), 11);
        assert_eq!(
            s.selection().range(&AttributeId::new("year")),
            Some(NumericRange::new(2008, 2024))
        );
    }

    #[test]
    fn same_collection_keeps_facets() {
        let mut s = session();
        let products = Arc::clone(s.products());
        let before = s.selection().revision();
        s.set_products(products);
        assert_eq!(s.selection().revision(), before);
    }

    #[test]
    fn visible_panels_shift_when_dependency_opens() {
        let mut s = session();
        let ids: Vec<&str> = s.visible_attributes().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["category", "brand", "country", "condition", "year"]);

        s.toggle_option(&AttributeId::new("brand"), "A").unwrap();
        let ids: Vec<&str> = s.visible_attributes().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["category", "brand", "model", "country", "condition", "year"]);

        // brand (index 1) is force-open; toggling index 0 opens category too.
        s.toggle_open_panel(0);
        assert!(s.is_panel_open(0));
        assert!(s.is_panel_open(1));
        assert!(!s.is_panel_open(2));
        assert!(!s.is_panel_open(42));
    }

    #[test]
    fn scenario_clear_then_filter_matches_fresh_session() {
        let mut s = session();
        s.toggle_option(&AttributeId::new("condition"), "Used").unwrap();
        s.set_range(&AttributeId::new("year"), NumericRange::new(2018, 2020))
            .unwrap();
        assert_eq!(s.filtered_count(), 3);

        s.clear();
        assert_eq!(s.filtered().indices(), session().filtered().indices());
    }
}
