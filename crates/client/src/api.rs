//! The remote catalog/content API.

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use storefront_catalog::{
    BlogPost, Brand, Category, CategoryList, Product, ProductListing, ProductPage, WebTextPlans,
};
use storefront_core::ProductId;

use crate::error::{ApiError, ApiResult};
use crate::query::ListingQuery;

/// Read-only view of the remote API. Page loaders and the paged loader only
/// ever talk to this trait, so tests substitute an in-memory catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /category`
    async fn categories(&self) -> ApiResult<Vec<Category>>;

    /// `GET /product?...` with the query's parameters.
    async fn products(&self, query: &ListingQuery) -> ApiResult<ProductPage>;

    /// `POST /product`: the whole catalog in one page (legacy slug archive).
    async fn all_products(&self) -> ApiResult<ProductPage>;

    /// `GET /product/{id}`
    async fn product(&self, id: &ProductId) -> ApiResult<Product>;

    /// `GET /web-text-plans`
    async fn web_text(&self) -> ApiResult<WebTextPlans>;

    /// `GET /blog/{slug}`
    async fn blog_post(&self, slug: &str) -> ApiResult<BlogPost>;

    /// `GET /brand`
    async fn brands(&self) -> ApiResult<Vec<Brand>>;
}

/// `CatalogApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "catalog request");

        let mut req = self.http.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(status = status.as_u16(), error = %e, "cannot read error body");
                    format!("<unreadable body: {e}>")
                }
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        let list: CategoryList = self.fetch(Method::GET, &["category"], &[]).await?;
        Ok(list.into_vec())
    }

    async fn products(&self, query: &ListingQuery) -> ApiResult<ProductPage> {
        let listing: ProductListing = self
            .fetch(Method::GET, &["product"], &query.to_pairs())
            .await?;
        Ok(listing.into_page())
    }

    async fn all_products(&self) -> ApiResult<ProductPage> {
        let listing: ProductListing = self.fetch(Method::POST, &["product"], &[]).await?;
        Ok(listing.into_page())
    }

    async fn product(&self, id: &ProductId) -> ApiResult<Product> {
        self.fetch(Method::GET, &["product", id.as_str()], &[]).await
    }

    async fn web_text(&self) -> ApiResult<WebTextPlans> {
        self.fetch(Method::GET, &["web-text-plans"], &[]).await
    }

    async fn blog_post(&self, slug: &str) -> ApiResult<BlogPost> {
        self.fetch(Method::GET, &["blog", slug], &[]).await
    }

    async fn brands(&self) -> ApiResult<Vec<Brand>> {
        self.fetch(Method::GET, &["brand"], &[]).await
    }
}
