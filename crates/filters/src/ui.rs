//! Transient presentation state: view mode, sort order, pagination, dialogs
//! and the product image gallery.
//!
//! None of it carries business rules; it exists so presentation code gets an
//! explicit state object instead of reaching for globals.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Entity, ProductId};

/// List or grid rendering of the archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Grid => "grid",
        }
    }

    /// Parse the `view` query parameter; anything unrecognised is `List`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("grid") => ViewMode::Grid,
            _ => ViewMode::List,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }
}

/// Archive sort order, round-tripped through the `sort` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// `sort=` (empty).
    #[default]
    Newest,
    /// `sort=mostViewed`.
    MostViewed,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Newest => "",
            SortOrder::MostViewed => "mostViewed",
        }
    }

    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("mostViewed") => SortOrder::MostViewed,
            _ => SortOrder::Newest,
        }
    }
}

/// Mode, sort and current page of an archive view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    mode: ViewMode,
    sort: SortOrder,
    page: u32,
    total_pages: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: ViewMode::List,
            sort: SortOrder::Newest,
            page: 1,
            total_pages: 1,
        }
    }
}

impl ViewState {
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Adopt the server's page count. Zero pages still shows page 1.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        self.page = self.page.clamp(1, self.total_pages);
    }

    /// Jump to `page`. Out-of-range requests are ignored; returns whether the
    /// page changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }
}

/// Numbered pagination over an in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page_size: usize,
    pub total_items: usize,
}

impl PageWindow {
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items,
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.total_items.div_ceil(self.page_size) as u32
    }

    /// Slice range of `page` (1-based) within the list; empty past the end.
    pub fn range(&self, page: u32) -> Range<usize> {
        let page = page.max(1) as usize;
        let start = ((page - 1) * self.page_size).min(self.total_items);
        let end = (page * self.page_size).min(self.total_items);
        start..end
    }

    /// 1-based "showing X to Y of N" bounds; `None` when the page is empty.
    pub fn showing(&self, page: u32) -> Option<(usize, usize)> {
        let range = self.range(page);
        if range.is_empty() {
            None
        } else {
            Some((range.start + 1, range.end))
        }
    }
}

/// The storefront's modal dialogs. At most one is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialog", rename_all = "camelCase")]
pub enum Dialog {
    /// Price inquiry, optionally about a specific product.
    Inquiry { product: Option<ProductId> },
    /// Mobile filters sheet.
    Filters,
    /// Mobile sort sheet.
    Sort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    open: Option<Dialog>,
}

impl DialogState {
    pub fn current(&self) -> Option<&Dialog> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open(&mut self, dialog: Dialog) {
        self.open = Some(dialog);
    }

    /// Open the inquiry dialog for `product`. Unavailable products cannot be
    /// inquired about; returns whether the dialog opened.
    pub fn inquire(&mut self, product: &Product) -> bool {
        if !product.is_available() {
            return false;
        }
        self.open = Some(Dialog::Inquiry {
            product: Some(product.id().clone()),
        });
        true
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

/// Number of thumbnails shown before the "+N" overflow tile.
const THUMBNAILS: usize = 3;

/// Product image gallery on the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    len: usize,
    current: usize,
    fullscreen: bool,
    overlay_open: bool,
}

impl GalleryState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: 0,
            fullscreen: false,
            overlay_open: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Select image `index`; picking from the overlay closes it.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        self.overlay_open = false;
        true
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn open_overlay(&mut self) {
        if self.overflow() > 0 {
            self.overlay_open = true;
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay_open = false;
    }

    /// Indices of the inline thumbnails.
    pub fn thumbnails(&self) -> Range<usize> {
        0..self.len.min(THUMBNAILS)
    }

    /// Images hidden behind the "+N" tile.
    pub fn overflow(&self) -> usize {
        self.len.saturating_sub(THUMBNAILS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_defaults_to_list_and_parses_closed_set() {
        assert_eq!(ViewMode::default(), ViewMode::List);
        assert_eq!(ViewMode::from_param(Some("grid")), ViewMode::Grid);
        assert_eq!(ViewMode::from_param(Some("table")), ViewMode::List);
        assert_eq!(ViewMode::from_param(None), ViewMode::List);

        let mut state = ViewState::default();
        state.toggle_mode();
        assert_eq!(state.mode(), ViewMode::Grid);
        state.toggle_mode();
        assert_eq!(state.mode(), ViewMode::List);
    }

    #[test]
    fn sort_round_trips_through_param() {
        for sort in [SortOrder::Newest, SortOrder::MostViewed] {
            assert_eq!(SortOrder::from_param(Some(sort.as_param())), sort);
        }
        assert_eq!(SortOrder::from_param(Some("cheapest")), SortOrder::Newest);
    }

    #[test]
    fn page_stays_within_bounds() {
        let mut state = ViewState::default();
        assert!(!state.next_page());

        state.set_total_pages(3);
        assert!(state.next_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.page(), 3);
        assert!(!state.set_page(0));
        assert!(!state.set_page(4));

        state.set_total_pages(2);
        assert_eq!(state.page(), 2);

        state.set_total_pages(0);
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn page_window_reports_showing_bounds() {
        let window = PageWindow::new(6, 14);
        assert_eq!(window.total_pages(), 3);
        assert_eq!(window.range(1), 0..6);
        assert_eq!(window.showing(3), Some((13, 14)));
        assert_eq!(window.showing(4), None);
        assert_eq!(PageWindow::new(6, 0).total_pages(), 0);
    }

    #[test]
    fn inquiry_requires_available_product() {
        let mut dialogs = DialogState::default();
        let sold = Product::new("p1", "Sold").with_available(false);
        let listed = Product::new("p2", "Listed").with_available(true);

        assert!(!dialogs.inquire(&sold));
        assert!(!dialogs.is_open());

        assert!(dialogs.inquire(&listed));
        assert_eq!(
            dialogs.current(),
            Some(&Dialog::Inquiry {
                product: Some(ProductId::new("p2"))
            })
        );

        dialogs.open(Dialog::Sort);
        assert_eq!(dialogs.current(), Some(&Dialog::Sort));
        dialogs.close();
        assert!(!dialogs.is_open());
    }

    #[test]
    fn gallery_thumbnails_and_overflow() {
        let mut gallery = GalleryState::new(5);
        assert_eq!(gallery.thumbnails(), 0..3);
        assert_eq!(gallery.overflow(), 2);

        gallery.open_overlay();
        assert!(gallery.is_overlay_open());
        assert!(gallery.select(4));
        assert_eq!(gallery.current(), 4);
        assert!(!gallery.is_overlay_open());
        assert!(!gallery.select(5));

        let mut small = GalleryState::new(2);
        small.open_overlay();
        assert!(!small.is_overlay_open());
        assert_eq!(small.thumbnails(), 0..2);
    }
}
