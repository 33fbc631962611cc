//! Incremental ("load more") listing loader.
//!
//! One request is in flight at a time. Results that arrive after the loader was
//! restarted or closed are dropped, and a cancelled request (its future
//! dropped) releases the in-flight slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use storefront_catalog::{Product, ProductPage};

use crate::api::CatalogApi;
use crate::error::ApiError;
use crate::query::ListingQuery;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("loader is closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page `page` arrived and `added` products were appended.
    Appended { page: u32, added: usize },
    /// The visible set was replaced by page 1 of a new query.
    Restarted { added: usize },
    /// Every page has been loaded; no request was made.
    Exhausted,
    /// Another request is still in flight; no request was made.
    AlreadyLoading,
    /// The response arrived after a restart or close and was dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
}

/// Point-in-time copy of the loader state.
#[derive(Debug, Clone)]
pub struct LoaderSnapshot {
    pub items: Arc<Vec<Product>>,
    pub query: ListingQuery,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_docs: u64,
    pub phase: LoadPhase,
}

impl LoaderSnapshot {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug)]
struct LoaderState {
    query: ListingQuery,
    items: Arc<Vec<Product>>,
    current_page: u32,
    total_pages: u32,
    total_docs: u64,
    generation: u64,
    /// Generation of the request currently in flight.
    in_flight: Option<u64>,
    closed: bool,
}

impl LoaderState {
    fn adopt_totals(&mut self, page: &ProductPage) {
        self.total_docs = page.total_docs;
        self.total_pages = page.total_pages;
    }
}

/// Cloneable handle; clones share one state.
pub struct PagedLoader<A: ?Sized = dyn CatalogApi> {
    api: Arc<A>,
    state: Arc<Mutex<LoaderState>>,
}

impl<A: ?Sized> Clone for PagedLoader<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: CatalogApi + ?Sized> PagedLoader<A> {
    /// An empty loader; the first `load_more` fetches page 1.
    pub fn new(api: Arc<A>, query: ListingQuery) -> Self {
        Self::with_state(
            api,
            LoaderState {
                query,
                items: Arc::new(Vec::new()),
                current_page: 0,
                total_pages: 1,
                total_docs: 0,
                generation: 0,
                in_flight: None,
                closed: false,
            },
        )
    }

    /// A loader seeded with an already fetched first page.
    pub fn from_first_page(api: Arc<A>, query: ListingQuery, first: ProductPage) -> Self {
        Self::with_state(
            api,
            LoaderState {
                query,
                current_page: 1,
                total_pages: first.total_pages,
                total_docs: first.total_docs,
                items: Arc::new(first.docs),
                generation: 0,
                in_flight: None,
                closed: false,
            },
        )
    }

    fn with_state(api: Arc<A>, state: LoaderState) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Fetch and append the next page.
    ///
    /// On failure the error is returned and nothing changes, so the call can be
    /// retried.
    pub async fn load_more(&self) -> Result<LoadOutcome, LoadError> {
        let (generation, query) = {
            let mut st = lock(&self.state);
            if st.closed {
                return Err(LoadError::Closed);
            }
            if st.in_flight.is_some() {
                return Ok(LoadOutcome::AlreadyLoading);
            }
            if st.current_page >= st.total_pages {
                return Ok(LoadOutcome::Exhausted);
            }
            st.in_flight = Some(st.generation);
            (st.generation, st.query.with_page(st.current_page + 1))
        };

        let guard = InFlight::new(&self.state, generation);
        let result = self.api.products(&query).await;
        let mut st = guard.settle();

        if st.closed || st.generation != generation {
            tracing::debug!(generation, "discarding stale listing page");
            return Ok(LoadOutcome::Discarded);
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(error = %err, page = st.current_page + 1, "listing page failed");
                return Err(err.into());
            }
        };

        let added = page.docs.len();
        let mut items = Vec::with_capacity(st.items.len() + added);
        items.extend_from_slice(&st.items);
        items.extend(page.docs.iter().cloned());

        st.items = Arc::new(items);
        st.current_page += 1;
        st.adopt_totals(&page);

        tracing::info!(
            page = st.current_page,
            added,
            total_docs = st.total_docs,
            total_pages = st.total_pages,
            "listing page loaded"
        );
        Ok(LoadOutcome::Appended {
            page: st.current_page,
            added,
        })
    }

    /// Switch to a new query and replace the visible set with its first page.
    ///
    /// Any request still in flight for the previous query is dropped on
    /// arrival. On failure the previous query and items are kept.
    pub async fn restart(&self, query: ListingQuery) -> Result<LoadOutcome, LoadError> {
        let first = query.with_page(1);
        let generation = {
            let mut st = lock(&self.state);
            if st.closed {
                return Err(LoadError::Closed);
            }
            st.generation += 1;
            st.in_flight = Some(st.generation);
            st.generation
        };

        let guard = InFlight::new(&self.state, generation);
        let result = self.api.products(&first).await;
        let mut st = guard.settle();

        if st.closed || st.generation != generation {
            return Ok(LoadOutcome::Discarded);
        }

        let page = result.map_err(|err| {
            tracing::warn!(error = %err, "listing restart failed");
            LoadError::from(err)
        })?;

        let added = page.docs.len();
        st.adopt_totals(&page);
        st.items = Arc::new(page.docs);
        st.current_page = 1;
        st.query = query;

        tracing::info!(added, total_docs = st.total_docs, "listing restarted");
        Ok(LoadOutcome::Restarted { added })
    }

    /// Tear the session down. A request still in flight is dropped on arrival.
    pub fn close(&self) {
        let mut st = lock(&self.state);
        st.closed = true;
        st.generation += 1;
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        let st = lock(&self.state);
        LoaderSnapshot {
            items: Arc::clone(&st.items),
            query: st.query.clone(),
            current_page: st.current_page,
            total_pages: st.total_pages,
            total_docs: st.total_docs,
            phase: if st.in_flight.is_some() {
                LoadPhase::Loading
            } else {
                LoadPhase::Idle
            },
        }
    }
}

fn lock(state: &Mutex<LoaderState>) -> MutexGuard<'_, LoaderState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the in-flight slot if the request future is dropped before it
/// settles.
struct InFlight<'a> {
    state: &'a Mutex<LoaderState>,
    generation: u64,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<LoaderState>, generation: u64) -> Self {
        Self {
            state,
            generation,
            armed: true,
        }
    }

    /// The request completed; release the slot and hand back the lock.
    fn settle(mut self) -> MutexGuard<'a, LoaderState> {
        self.armed = false;
        let mut st = lock(self.state);
        release(&mut st, self.generation);
        st
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            release(&mut lock(self.state), self.generation);
        }
    }
}

fn release(st: &mut LoaderState, generation: u64) {
    if st.in_flight == Some(generation) {
        st.in_flight = None;
    }
}
