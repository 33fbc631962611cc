//! Archive-page filtering: facet extraction, the filter selection store, the
//! filtered view, and the transient view/UI state around them.
//!
//! Everything here is synchronous and deterministic. Network paging lives in
//! `storefront-client`; this crate only sees whatever product collection it is
//! handed.

pub mod attribute;
pub mod facets;
pub mod selection;
pub mod session;
pub mod ui;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures;

pub use attribute::{
    Attribute, AttributeKind, FacetDefinition, FacetKind, FacetSchema, NumericRange, OptionCount,
};
pub use facets::{FacetCache, extract};
pub use selection::{FilterSelection, Selection, SelectionError};
pub use session::ListingSession;
pub use ui::{Dialog, DialogState, GalleryState, PageWindow, SortOrder, ViewMode, ViewState};
pub use view::{FilteredView, compute, filter_products};
