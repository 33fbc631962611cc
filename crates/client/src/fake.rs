//! In-memory `CatalogApi` for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use storefront_catalog::{
    BlogPost, Brand, Category, CategoryRef, Product, ProductPage, WebTextPlans,
};
use storefront_core::ProductId;

use crate::api::CatalogApi;
use crate::error::{ApiError, ApiResult};
use crate::query::ListingQuery;

#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub web_text: WebTextPlans,
    pub posts: BTreeMap<String, BlogPost>,
    pub delay: Duration,
    failing: AtomicBool,
    product_calls: AtomicUsize,
    last_query: Mutex<Option<ListingQuery>>,
}

impl FakeCatalog {
    /// `n` products `p0..p{n-1}` titled `Machine {i}`, all in category `c1`.
    pub fn with_products(n: usize) -> Self {
        let products = (0..n)
            .map(|i| {
                Product::new(format!("p{i}"), format!("Machine {i}"))
                    .with_category(CategoryRef::new("c1", "Excavators"))
                    .with_available(i % 2 == 0)
            })
            .collect();
        Self {
            products,
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ListingQuery> {
        self.last_query.lock().unwrap().clone()
    }

    async fn respond(&self) -> ApiResult<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.respond().await?;
        Ok(self.categories.clone())
    }

    async fn products(&self, query: &ListingQuery) -> ApiResult<ProductPage> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.respond().await?;

        let needle = query.q.to_lowercase();
        let matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| needle.is_empty() || p.title().to_lowercase().contains(&needle))
            .filter(|p| {
                query.category.is_empty()
                    || p.category().is_some_and(|c| c.id.as_str() == query.category)
            })
            .filter(|p| {
                query.filters.ranges.iter().all(|(id, range)| {
                    id.as_str() != "year" || p.year_of_manufacture().is_some_and(|y| range.contains(y))
                })
            })
            .collect();

        let limit = query.limit.unwrap_or(10).max(1) as usize;
        let page = query.page.unwrap_or(1).max(1) as usize;
        let docs = matching
            .iter()
            .skip((page - 1) * limit)
            .take(limit)
            .map(|p| (*p).clone())
            .collect();

        Ok(ProductPage {
            docs,
            total_docs: matching.len() as u64,
            total_pages: matching.len().div_ceil(limit) as u32,
        })
    }

    async fn all_products(&self) -> ApiResult<ProductPage> {
        self.respond().await?;
        Ok(ProductPage {
            docs: self.products.clone(),
            total_docs: self.products.len() as u64,
            total_pages: u32::from(!self.products.is_empty()),
        })
    }

    async fn product(&self, id: &ProductId) -> ApiResult<Product> {
        self.respond().await?;
        self.products
            .iter()
            .find(|p| p.id_typed() == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn web_text(&self) -> ApiResult<WebTextPlans> {
        self.respond().await?;
        Ok(self.web_text.clone())
    }

    async fn blog_post(&self, slug: &str) -> ApiResult<BlogPost> {
        self.respond().await?;
        self.posts.get(slug).cloned().ok_or(ApiError::NotFound)
    }

    async fn brands(&self) -> ApiResult<Vec<Brand>> {
        self.respond().await?;
        Ok(self.brands.clone())
    }
}
