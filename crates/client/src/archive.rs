//! The archive page's client-side controller: incremental loading, filters,
//! sort and search over one listing session.

use std::sync::Arc;

use storefront_catalog::ProductPage;
use storefront_filters::{FacetSchema, ListingSession, SortOrder, ViewMode};

use crate::api::CatalogApi;
use crate::loader::{LoadError, LoadOutcome, LoaderSnapshot, PagedLoader};
use crate::query::{FilterParams, ListingQuery};

/// Couples a [`PagedLoader`] with the [`ListingSession`] that filters what it
/// has loaded. Every settled load is pushed into the session so facets and the
/// filtered view follow the loaded collection.
pub struct ArchiveController<A: ?Sized = dyn CatalogApi> {
    loader: PagedLoader<A>,
    listing: ListingSession,
}

impl<A: CatalogApi + ?Sized> ArchiveController<A> {
    pub fn new(api: Arc<A>, schema: FacetSchema, query: ListingQuery) -> Self {
        Self::assemble(PagedLoader::new(api, query), schema)
    }

    /// Start from a first page fetched during the initial render.
    pub fn from_first_page(
        api: Arc<A>,
        schema: FacetSchema,
        query: ListingQuery,
        first: ProductPage,
    ) -> Self {
        Self::assemble(PagedLoader::from_first_page(api, query, first), schema)
    }

    fn assemble(loader: PagedLoader<A>, schema: FacetSchema) -> Self {
        let snapshot = loader.snapshot();
        let mut listing = ListingSession::new(schema, Arc::clone(&snapshot.items));
        snapshot.query.apply_to(listing.selection_mut());
        if let Some(view) = snapshot.query.view {
            listing.view_state_mut().set_mode(view);
        }
        listing.view_state_mut().set_sort(snapshot.query.sort);

        let mut controller = Self { loader, listing };
        controller.sync(&snapshot);
        controller
    }

    pub fn listing(&self) -> &ListingSession {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut ListingSession {
        &mut self.listing
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        self.loader.snapshot()
    }

    /// "Load more" is offered while fewer items are loaded than the server
    /// reports and pages remain.
    pub fn can_load_more(&self) -> bool {
        let snap = self.loader.snapshot();
        (snap.items.len() as u64) < snap.total_docs && snap.has_more()
    }

    pub async fn load_more(&mut self) -> Result<LoadOutcome, LoadError> {
        let outcome = self.loader.load_more().await?;
        let snapshot = self.loader.snapshot();
        self.sync(&snapshot);
        Ok(outcome)
    }

    /// Send the current effective filters to the server and start over from
    /// page 1.
    pub async fn apply_filters(&mut self) -> Result<LoadOutcome, LoadError> {
        let mut query = self.loader.snapshot().query;
        query.filters = FilterParams::from_selection(self.listing.selection(), self.listing.attributes());

        // The reloaded bounds will equal the sent ranges; keep them requested.
        let selection = self.listing.selection_mut();
        for (id, range) in &query.filters.ranges {
            let _ = selection.pin_range(id, *range);
        }
        self.restart(query).await
    }

    pub async fn set_sort(&mut self, sort: SortOrder) -> Result<LoadOutcome, LoadError> {
        self.listing.view_state_mut().set_sort(sort);
        let mut query = self.loader.snapshot().query;
        query.sort = sort;
        self.restart(query).await
    }

    pub async fn search(&mut self, q: &str) -> Result<LoadOutcome, LoadError> {
        let mut query = self.loader.snapshot().query;
        query.q = q.trim().to_owned();
        self.restart(query).await
    }

    /// Presentation only; no request.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.listing.view_state_mut().set_mode(mode);
    }

    pub fn close(&self) {
        self.loader.close();
    }

    async fn restart(&mut self, query: ListingQuery) -> Result<LoadOutcome, LoadError> {
        let outcome = self.loader.restart(query).await?;
        let snapshot = self.loader.snapshot();
        self.sync(&snapshot);
        Ok(outcome)
    }

    fn sync(&mut self, snapshot: &LoaderSnapshot) {
        self.listing.set_products(Arc::clone(&snapshot.items));
        let view_state = self.listing.view_state_mut();
        view_state.set_total_pages(snapshot.total_pages);
        view_state.set_page(snapshot.current_page.max(1));
    }
}
