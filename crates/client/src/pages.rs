//! Page loaders: fetch what a page needs, decide between rendering,
//! redirecting and not-found, and degrade gracefully when metadata is missing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storefront_catalog::{
    Banner, BlogPost, Brand, Category, HeaderMenu, Product, ProductPage, Redirect, WebTextPlans,
    find_category,
};
use storefront_core::{BrandId, ProductId};
use storefront_filters::{SortOrder, ViewMode};

use crate::api::CatalogApi;
use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::query::ListingQuery;

/// Title used when site metadata could not be fetched.
pub const FALLBACK_TITLE: &str = "Error fetching information";
/// Inline notice for an empty or failed product listing.
pub const NO_RESULTS: &str = "No products matched your search";
pub const NO_BRANDS: &str = "No brands available";
const DEFAULT_ARCHIVE_HEADING: &str = "Products";
const BLOG_DATE_FORMAT: &str = "%Y/%m/%d";

/// What a page loader decided.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Render(T),
    Redirect(Redirect),
    NotFound,
}

impl<T> PageOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageOutcome<U> {
        match self {
            PageOutcome::Render(page) => PageOutcome::Render(f(page)),
            PageOutcome::Redirect(r) => PageOutcome::Redirect(r),
            PageOutcome::NotFound => PageOutcome::NotFound,
        }
    }

    pub fn into_page(self) -> Option<T> {
        match self {
            PageOutcome::Render(page) => Some(page),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

impl PageMetadata {
    fn fallback(canonical: String) -> Self {
        Self {
            title: FALLBACK_TITLE.to_owned(),
            description: None,
            canonical: Some(canonical),
        }
    }
}

/// `"{title} - {site}"`, or just `title` when the site has no name.
fn site_title(title: &str, site: &str) -> String {
    if site.trim().is_empty() {
        title.to_owned()
    } else {
        format!("{title} - {site}")
    }
}

fn first_set(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

// -------------------------
// Archive
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePage {
    pub metadata: PageMetadata,
    pub heading: String,
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub products: ProductPage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub banners: Vec<Banner>,
    pub menus: Vec<HeaderMenu>,
    pub sort: SortOrder,
    pub view: ViewMode,
    /// The query the first page was fetched with (page and limit filled in).
    #[serde(skip)]
    pub query: ListingQuery,
}

/// `/archive?category&q&sort&...`: the query-parameter archive.
pub async fn load_archive<A: CatalogApi + ?Sized>(
    api: &A,
    config: &StorefrontConfig,
    query: &ListingQuery,
) -> PageOutcome<ArchivePage> {
    archive(api, config, query.clone(), false).await
}

/// `/archive/{category}`: same contract, but an unknown category is a 404.
pub async fn load_category_archive<A: CatalogApi + ?Sized>(
    api: &A,
    config: &StorefrontConfig,
    category: &str,
    query: &ListingQuery,
) -> PageOutcome<ArchivePage> {
    let query = ListingQuery {
        category: category.to_owned(),
        ..query.clone()
    };
    archive(api, config, query, true).await
}

async fn archive<A: CatalogApi + ?Sized>(
    api: &A,
    config: &StorefrontConfig,
    mut query: ListingQuery,
    require_category: bool,
) -> PageOutcome<ArchivePage> {
    query.page = Some(query.page.unwrap_or(1));
    query.limit = Some(query.limit.unwrap_or(config.page_size));

    let (info, categories, products) =
        tokio::join!(api.web_text(), api.categories(), api.products(&query));

    let info = match info {
        Ok(info) => Some(info),
        Err(err) => {
            tracing::warn!(error = %err, "web text unavailable; using fallback metadata");
            None
        }
    };
    if let Some(redirect) = info.as_ref().and_then(WebTextPlans::archive_redirect) {
        tracing::info!(location = %redirect.location, "archive redirected");
        return PageOutcome::Redirect(redirect);
    }

    let (categories, category) = match categories {
        Ok(categories) => {
            let category = find_category(&categories, &query.category).cloned();
            if require_category && category.is_none() {
                return PageOutcome::NotFound;
            }
            (categories, category)
        }
        Err(err) => {
            tracing::warn!(error = %err, "categories unavailable");
            (Vec::new(), None)
        }
    };

    let products = products.unwrap_or_else(|err| {
        tracing::warn!(error = %err, category = %query.category, q = %query.q, "product listing failed");
        ProductPage::default()
    });
    let notice = products.is_empty().then(|| NO_RESULTS.to_owned());

    let metadata = match &info {
        Some(info) => archive_metadata(config, info, category.as_ref()),
        None => PageMetadata::fallback(config.app_link("archive")),
    };
    let heading = first_set([
        category.as_ref().map(|c| c.title.clone()),
        info.as_ref().and_then(|i| i.archive_product_title.clone()),
    ])
    .unwrap_or_else(|| DEFAULT_ARCHIVE_HEADING.to_owned());

    let (banners, menus) = info.map(|i| (i.banners, i.menus)).unwrap_or_default();

    PageOutcome::Render(ArchivePage {
        metadata,
        heading,
        categories,
        category,
        products,
        notice,
        banners,
        menus,
        sort: query.sort,
        view: query.view.unwrap_or_default(),
        query,
    })
}

fn archive_metadata(
    config: &StorefrontConfig,
    info: &WebTextPlans,
    category: Option<&Category>,
) -> PageMetadata {
    let seo_title = first_set([
        category.and_then(|c| c.seo_title.clone()),
        category.map(|c| c.title.clone()),
        info.archive_product_seo_title.clone(),
        info.archive_product_title.clone(),
    ])
    .unwrap_or_else(|| DEFAULT_ARCHIVE_HEADING.to_owned());

    PageMetadata {
        title: site_title(&seo_title, &info.title),
        description: first_set([
            category.and_then(|c| c.meta_data.clone()),
            info.archive_product_meta_data.clone(),
        ]),
        canonical: Some(
            first_set([info.archive_product_canonical.clone()])
                .unwrap_or_else(|| config.app_link("archive")),
        ),
    }
}

// -------------------------
// Blog
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    pub metadata: PageMetadata,
    pub title: String,
    /// Post body as HTML.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

pub async fn load_blog<A: CatalogApi + ?Sized>(
    api: &A,
    config: &StorefrontConfig,
    slug: &str,
) -> PageOutcome<BlogPage> {
    let post = match api.blog_post(slug).await {
        Ok(post) => post,
        Err(err) => {
            log_missing("blog post", slug, &err);
            return PageOutcome::NotFound;
        }
    };

    if let Some(redirect) = post.redirect() {
        return PageOutcome::Redirect(redirect);
    }

    PageOutcome::Render(blog_page(config, slug, post))
}

fn blog_page(config: &StorefrontConfig, slug: &str, post: BlogPost) -> BlogPage {
    let metadata = PageMetadata {
        title: first_set([post.seo_title.clone()]).unwrap_or_else(|| post.title.clone()),
        description: first_set([post.meta_data.clone()]),
        canonical: Some(
            first_set([post.canonical.clone()])
                .unwrap_or_else(|| config.app_link(&format!("blog/{slug}"))),
        ),
    };

    BlogPage {
        metadata,
        title: post.title,
        content: post.content,
        author: post.author,
        published: post.created_at.as_ref().map(format_date),
        image_url: post.image.as_deref().map(|i| config.image(i)),
    }
}

fn format_date(at: &DateTime<Utc>) -> String {
    at.format(BLOG_DATE_FORMAT).to_string()
}

fn log_missing(kind: &str, key: &str, err: &ApiError) {
    if err.is_not_found() {
        tracing::debug!(kind, key, "not found upstream");
    } else {
        tracing::warn!(kind, key, error = %err, "fetch failed; treating as not found");
    }
}

// -------------------------
// Product detail
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub metadata: PageMetadata,
    pub product: Product,
    /// Primary image first, then the gallery; resolved against the image host.
    pub image_urls: Vec<String>,
    /// Only available products can be inquired about.
    pub can_inquire: bool,
}

pub async fn load_product<A: CatalogApi + ?Sized>(
    api: &A,
    config: &StorefrontConfig,
    id: &ProductId,
) -> PageOutcome<ProductDetail> {
    let (product, info) = tokio::join!(api.product(id), api.web_text());
    let product = match product {
        Ok(product) => product,
        Err(err) => {
            log_missing("product", id.as_str(), &err);
            return PageOutcome::NotFound;
        }
    };

    let site = info.map(|i| i.title).unwrap_or_default();
    let mut image_urls: Vec<String> = Vec::with_capacity(product.gallery().len() + 1);
    for path in product.primary_image().into_iter().chain(product.gallery().iter().map(String::as_str)) {
        let url = config.image(path);
        if !image_urls.contains(&url) {
            image_urls.push(url);
        }
    }

    PageOutcome::Render(ProductDetail {
        metadata: PageMetadata {
            title: site_title(product.display_title(), &site),
            description: None,
            canonical: Some(config.app_link(&format!("product/{id}"))),
        },
        image_urls,
        can_inquire: product.is_available(),
        product,
    })
}

// -------------------------
// Home
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub metadata: PageMetadata,
    pub brands: Vec<Brand>,
    /// Brand highlighted in the brand strip; the first one by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_brand: Option<BrandId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub banners: Vec<Banner>,
    pub menus: Vec<HeaderMenu>,
}

impl HomePage {
    /// Highlight another brand. Unknown ids are ignored.
    pub fn select_brand(&mut self, id: &BrandId) -> bool {
        if self.brands.iter().any(|b| &b.id == id) {
            self.selected_brand = Some(id.clone());
            true
        } else {
            false
        }
    }
}

pub async fn load_home<A: CatalogApi + ?Sized>(
    api: &A,
    config: &StorefrontConfig,
) -> PageOutcome<HomePage> {
    let (brands, info) = tokio::join!(api.brands(), api.web_text());

    let brands = brands.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "brands unavailable");
        Vec::new()
    });
    let notice = brands.is_empty().then(|| NO_BRANDS.to_owned());

    let (metadata, banners, menus) = match info {
        Ok(info) => (
            PageMetadata {
                title: first_set([Some(info.title.clone())]).unwrap_or_else(|| FALLBACK_TITLE.to_owned()),
                description: None,
                canonical: Some(config.app_url.clone()),
            },
            info.banners,
            info.menus,
        ),
        Err(err) => {
            tracing::warn!(error = %err, "web text unavailable; using fallback metadata");
            (PageMetadata::fallback(config.app_url.clone()), Vec::new(), Vec::new())
        }
    };

    PageOutcome::Render(HomePage {
        metadata,
        selected_brand: brands.first().map(|b| b.id.clone()),
        brands,
        notice,
        banners,
        menus,
    })
}
