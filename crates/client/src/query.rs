//! Listing query parameters, as the archive page sends them to `GET /product`.

use std::collections::{BTreeMap, BTreeSet};

use reqwest::Url;

use storefront_core::AttributeId;
use storefront_filters::{Attribute, FilterSelection, NumericRange, Selection, SortOrder, ViewMode};

use crate::error::{ApiError, ApiResult};

/// The active filters in wire form.
///
/// Only effective selections are carried: a dependent attribute whose
/// prerequisite is unselected is left out, same as the in-memory view.
/// Ranges go out as requested, not as clamped to the loaded collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub options: BTreeMap<AttributeId, BTreeSet<String>>,
    pub ranges: BTreeMap<AttributeId, NumericRange>,
    pub in_stock_only: bool,
}

impl FilterParams {
    pub fn from_selection(selection: &FilterSelection, attributes: &[Attribute]) -> Self {
        let mut params = FilterParams {
            in_stock_only: selection.in_stock_only(),
            ..Default::default()
        };

        for attribute in attributes.iter().filter(|a| selection.is_effective(a)) {
            match selection.get(&attribute.id) {
                Some(Selection::Options(values)) => {
                    params.options.insert(attribute.id.clone(), values.clone());
                }
                Some(Selection::Range(_)) => {
                    if let Some(range) = selection.requested_range(&attribute.id) {
                        params.ranges.insert(attribute.id.clone(), range);
                    }
                }
                None => {}
            }
        }
        for (id, range) in selection.unobserved_pins() {
            params.ranges.insert(id.clone(), range);
        }

        params
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.ranges.is_empty() && !self.in_stock_only
    }

    fn push_pairs(&self, out: &mut Vec<(String, String)>) {
        for (id, values) in &self.options {
            for value in values {
                out.push((format!("filter[{id}]"), value.clone()));
            }
        }
        for (id, range) in &self.ranges {
            if range.min != i64::MIN {
                out.push((format!("min[{id}]"), range.min.to_string()));
            }
            if range.max != i64::MAX {
                out.push((format!("max[{id}]"), range.max.to_string()));
            }
        }
        if self.in_stock_only {
            out.push(("inStock".to_owned(), "true".to_owned()));
        }
    }
}

/// `GET /product` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub q: String,
    pub category: String,
    pub sort: SortOrder,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub view: Option<ViewMode>,
    pub filters: FilterParams,
}

impl ListingQuery {
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// Query pairs in send order. `q`, `category` and `sort` are always present
    /// (possibly empty), the rest only when set.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("q".to_owned(), self.q.clone()),
            ("category".to_owned(), self.category.clone()),
            ("sort".to_owned(), self.sort.as_param().to_owned()),
        ];
        if let Some(page) = self.page {
            out.push(("page".to_owned(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            out.push(("limit".to_owned(), limit.to_string()));
        }
        if let Some(view) = self.view {
            out.push(("view".to_owned(), view.as_str().to_owned()));
        }
        self.filters.push_pairs(&mut out);
        out
    }

    /// `{api_url}/product?...`, the URL a browser fetches for this query.
    pub fn listing_url(&self, api_url: &str) -> ApiResult<Url> {
        let raw = format!("{}/product", api_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        url.query_pairs_mut().extend_pairs(self.to_pairs());
        Ok(url)
    }

    /// Parse incoming page parameters. Unknown keys and malformed numbers are
    /// ignored rather than rejected; a half-open range takes the missing end
    /// from the other one.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ListingQuery::default();
        let mut mins: BTreeMap<AttributeId, i64> = BTreeMap::new();
        let mut maxs: BTreeMap<AttributeId, i64> = BTreeMap::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "q" => query.q = value.trim().to_owned(),
                "category" => query.category = value.trim().to_owned(),
                "sort" => query.sort = SortOrder::from_param(Some(value)),
                "page" => query.page = value.parse().ok().filter(|p| *p >= 1),
                "limit" => query.limit = value.parse().ok().filter(|l| *l >= 1),
                "view" => query.view = Some(ViewMode::from_param(Some(value))),
                "inStock" => query.filters.in_stock_only = value == "true",
                _ => {
                    if let Some(id) = bracketed(key, "filter") {
                        if !value.is_empty() {
                            query
                                .filters
                                .options
                                .entry(id)
                                .or_default()
                                .insert(value.to_owned());
                        }
                    } else if let Some(id) = bracketed(key, "min") {
                        if let Ok(v) = value.parse() {
                            mins.insert(id, v);
                        }
                    } else if let Some(id) = bracketed(key, "max") {
                        if let Ok(v) = value.parse() {
                            maxs.insert(id, v);
                        }
                    }
                }
            }
        }

        let ids: BTreeSet<AttributeId> = mins.keys().chain(maxs.keys()).cloned().collect();
        for id in ids {
            let (min, max) = match (mins.get(&id), maxs.get(&id)) {
                (Some(&min), Some(&max)) => (min, max),
                (Some(&min), None) => (min, i64::MAX),
                (None, Some(&max)) => (i64::MIN, max),
                (None, None) => continue,
            };
            query.filters.ranges.insert(id, NumericRange::new(min, max));
        }

        query
    }

    /// Replay the wire filters onto a selection. Ranges are pinned since the
    /// server has already applied them. Options that no longer apply (unknown
    /// attribute, wrong kind) are skipped.
    pub fn apply_to(&self, selection: &mut FilterSelection) {
        selection.clear();
        for (id, values) in &self.filters.options {
            for value in values {
                if !selection.is_checked(id, value) {
                    let _ = selection.toggle_option(id, value);
                }
            }
        }
        for (id, range) in &self.filters.ranges {
            let _ = selection.pin_range(id, *range);
        }
        selection.set_in_stock_only(self.filters.in_stock_only);
    }
}

fn bracketed(key: &str, prefix: &str) -> Option<AttributeId> {
    let id = key.strip_prefix(prefix)?.strip_prefix('[')?.strip_suffix(']')?;
    id.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::Product;
    use storefront_filters::{FacetSchema, extract};

    fn pairs(query: &ListingQuery) -> Vec<(String, String)> {
        query.to_pairs()
    }

    fn attrs() -> Vec<Attribute> {
        use storefront_catalog::Brand;
        let products = vec![
            Product::new("p1", "One").with_brand(Brand::new("a", "A")).with_option("A-1").with_year(2010),
            Product::new("p2", "Two").with_brand(Brand::new("b", "B")).with_option("B-2").with_year(2024),
        ];
        extract(&FacetSchema::storefront_default(), &products)
    }

    #[test]
    fn base_pairs_always_present() {
        let q = ListingQuery::default();
        assert_eq!(
            pairs(&q),
            vec![
                ("q".to_owned(), String::new()),
                ("category".to_owned(), String::new()),
                ("sort".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn serializes_page_limit_view_and_filters() {
        let mut q = ListingQuery::for_category("c1");
        q.sort = SortOrder::MostViewed;
        q.limit = Some(10);
        q.view = Some(ViewMode::Grid);
        q.filters.options.insert("brand".parse().unwrap(), ["A".to_owned(), "B".to_owned()].into());
        q.filters.ranges.insert("year".parse().unwrap(), NumericRange::new(2018, 2020));
        q.filters.in_stock_only = true;

        let got = pairs(&q.with_page(3));
        let expect: Vec<(String, String)> = [
            ("q", ""),
            ("category", "c1"),
            ("sort", "mostViewed"),
            ("page", "3"),
            ("limit", "10"),
            ("view", "grid"),
            ("filter[brand]", "A"),
            ("filter[brand]", "B"),
            ("min[year]", "2018"),
            ("max[year]", "2020"),
            ("inStock", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        assert_eq!(got, expect);
    }

    #[test]
    fn listing_url_encodes_pairs() {
        let mut q = ListingQuery::for_category("c 1").with_page(2);
        q.filters.options.insert("brand".parse().unwrap(), ["A&B".to_owned()].into());
        let url = q.listing_url("https://api.example.com/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/product?q=&category=c+1&sort=&page=2&filter%5Bbrand%5D=A%26B"
        );
    }

    #[test]
    fn from_pairs_reads_what_to_pairs_writes() {
        let mut q = ListingQuery::for_category("c1");
        q.q = "loader".into();
        q.page = Some(2);
        q.filters.options.insert("brand".parse().unwrap(), ["A".to_owned()].into());
        q.filters.ranges.insert("year".parse().unwrap(), NumericRange::new(2018, 2020));

        assert_eq!(ListingQuery::from_pairs(q.to_pairs()), q);
    }

    #[test]
    fn from_pairs_is_lenient() {
        let q = ListingQuery::from_pairs([
            ("page", "zero"),
            ("limit", "0"),
            ("sort", "cheapest"),
            ("filter[]", "x"),
            ("filter[brand]", ""),
            ("min[year]", "2015"),
            ("unknown", "1"),
        ]);
        assert_eq!(q.page, None);
        assert_eq!(q.limit, None);
        assert_eq!(q.sort, SortOrder::Newest);
        assert!(q.filters.options.is_empty());
        assert_eq!(
            q.filters.ranges.get(&"year".parse().unwrap()),
            Some(&NumericRange::new(2015, i64::MAX))
        );
    }

    #[test]
    fn from_selection_keeps_only_effective_filters() {
        let attributes = attrs();
        let mut selection = FilterSelection::new(&attributes);
        let model: AttributeId = "model".parse().unwrap();
        let brand: AttributeId = "brand".parse().unwrap();

        selection.toggle_option(&model, "A-1").unwrap();
        let params = FilterParams::from_selection(&selection, &attributes);
        assert!(params.is_empty());

        selection.toggle_option(&brand, "A").unwrap();
        let params = FilterParams::from_selection(&selection, &attributes);
        assert_eq!(params.options.len(), 2);
        assert!(params.ranges.is_empty());
    }

    #[test]
    fn apply_to_replays_and_clamps() {
        let attributes = attrs();
        let mut selection = FilterSelection::new(&attributes);
        let q = ListingQuery::from_pairs([
            ("filter[brand]", "B"),
            ("filter[nope]", "x"),
            ("min[year]", "1990"),
            ("max[year]", "2020"),
            ("inStock", "true"),
        ]);
        q.apply_to(&mut selection);

        let year: AttributeId = "year".parse().unwrap();
        assert!(selection.is_checked(&"brand".parse().unwrap(), "B"));
        assert_eq!(selection.range(&year), Some(NumericRange::new(2010, 2020)));
        assert_eq!(selection.requested_range(&year), Some(NumericRange::new(1990, 2020)));
        assert!(selection.in_stock_only());
    }

    #[test]
    fn url_range_survives_a_narrowed_collection() {
        // The server already applied the range, so the loaded bounds equal it.
        let products = vec![
            Product::new("p1", "One").with_year(2018),
            Product::new("p2", "Two").with_year(2020),
        ];
        let attributes = extract(&FacetSchema::storefront_default(), &products);
        let mut selection = FilterSelection::new(&attributes);
        let q = ListingQuery::from_pairs([("min[year]", "2018"), ("max[year]", "2020")]);
        q.apply_to(&mut selection);

        let params = FilterParams::from_selection(&selection, &attributes);
        assert_eq!(
            params.ranges.get(&"year".parse().unwrap()),
            Some(&NumericRange::new(2018, 2020))
        );
    }

    #[test]
    fn url_range_without_loaded_attributes_is_still_sent() {
        let mut selection = FilterSelection::new(&[]);
        let q = ListingQuery::from_pairs([("min[year]", "2018")]);
        q.apply_to(&mut selection);

        let params = FilterParams::from_selection(&selection, &[]);
        assert_eq!(params.ranges, q.filters.ranges);
        let sent = ListingQuery {
            filters: params,
            ..Default::default()
        }
        .to_pairs();
        assert!(sent.contains(&("min[year]".to_owned(), "2018".to_owned())));
        assert!(!sent.iter().any(|(k, _)| k == "max[year]"));
    }
}
