use serde::Serialize;

use storefront_client::{ArchivePage, ProductDetail};
use storefront_filters::{Attribute, FacetSchema, GalleryState, ListingSession, PageWindow};

// -------------------------
// Archive
// -------------------------

/// A facet as the filter sidebar renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetView {
    #[serde(flatten)]
    pub attribute: Attribute,
    /// Expanded because it has an active selection.
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Showing {
    pub from: usize,
    pub to: usize,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    #[serde(flatten)]
    pub page: ArchivePage,
    /// Visible facets only: dependent ones appear once their prerequisite is
    /// selected.
    pub facets: Vec<FacetView>,
    pub in_stock_only: bool,
    /// Products of the first page that pass the URL filters.
    pub filtered_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showing: Option<Showing>,
    pub can_load_more: bool,
    /// API URL of the next page, for the "load more" button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
}

impl ArchiveResponse {
    pub fn build(page: ArchivePage, schema: &FacetSchema, api_url: &str) -> Self {
        let mut listing = ListingSession::new(schema.clone(), page.products.docs.clone());
        page.query.apply_to(listing.selection_mut());

        let facets = listing
            .visible_attributes()
            .into_iter()
            .enumerate()
            .map(|(index, attribute)| FacetView {
                attribute: attribute.clone(),
                open: listing.selection().is_panel_open(index, attribute),
            })
            .collect();
        let in_stock_only = listing.selection().in_stock_only();
        let filtered_count = listing.filtered_count();

        let current = page.query.page.unwrap_or(1);
        let limit = page.query.limit.unwrap_or(1) as usize;
        let total_docs = page.products.total_docs;
        let showing = PageWindow::new(limit, total_docs as usize)
            .showing(current)
            .map(|(from, to)| Showing {
                from,
                to,
                total: total_docs,
            });

        let can_load_more =
            (page.products.docs.len() as u64) < total_docs && current < page.products.total_pages;
        let next_page_url = if can_load_more {
            match page.query.with_page(current + 1).listing_url(api_url) {
                Ok(url) => Some(url.to_string()),
                Err(err) => {
                    tracing::warn!(error = %err, "cannot build next page URL");
                    None
                }
            }
        } else {
            None
        };

        Self {
            page,
            facets,
            in_stock_only,
            filtered_count,
            showing,
            can_load_more,
            next_page_url,
        }
    }
}

// -------------------------
// Product detail
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    /// Inline thumbnails (at most three).
    pub thumbnails: Vec<String>,
    /// Count behind the "+N" tile.
    pub overflow: usize,
}

impl GalleryView {
    pub fn new(image_urls: &[String]) -> Self {
        let gallery = GalleryState::new(image_urls.len());
        Self {
            thumbnails: image_urls[gallery.thumbnails()].to_vec(),
            overflow: gallery.overflow(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(flatten)]
    pub detail: ProductDetail,
    pub gallery: GalleryView,
}

impl From<ProductDetail> for ProductResponse {
    fn from(detail: ProductDetail) -> Self {
        let gallery = GalleryView::new(&detail.image_urls);
        Self { detail, gallery }
    }
}
