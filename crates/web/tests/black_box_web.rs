use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::redirect::Policy;

use storefront_catalog::{
    BlogPost, Brand, Category, CategoryRef, Product, ProductPage, RedirectStatus, WebTextPlans,
};
use storefront_client::{ApiError, ApiResult, CatalogApi, ListingQuery, StorefrontConfig};
use storefront_core::{AttributeId, ProductId};
use storefront_web::app::{AppState, build_app};

/// Canned upstream: seven machines in "c1", brands A and B.
struct CannedCatalog {
    products: Vec<Product>,
    archive_redirect: bool,
}

impl CannedCatalog {
    fn new() -> Self {
        let products = (0..7)
            .map(|i| {
                let brand = if i < 3 { "A" } else { "B" };
                Product::new(format!("p{i}"), format!("Machine {i}"))
                    .with_category(CategoryRef::new("c1", "Excavators"))
                    .with_brand(Brand::new(brand.to_lowercase(), brand))
                    .with_option(format!("{brand}-{}", i % 2))
                    .with_year(2015 + i)
                    .with_available(i % 2 == 0)
                    .with_gallery((0..5).map(|g| format!("p{i}/{g}.jpg")).collect())
            })
            .collect();
        Self {
            products,
            archive_redirect: false,
        }
    }
}

#[async_trait]
impl CatalogApi for CannedCatalog {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        Ok(vec![Category {
            id: "c1".into(),
            title: "Excavators".into(),
            description: None,
            seo_title: Some("Buy excavators".into()),
            meta_data: None,
        }])
    }

    async fn products(&self, query: &ListingQuery) -> ApiResult<ProductPage> {
        let limit = query.limit.unwrap_or(10) as usize;
        let page = query.page.unwrap_or(1) as usize;
        let year = query.filters.ranges.get(&AttributeId::new("year"));
        let matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| query.category.is_empty() || p.category().is_some_and(|c| c.id.as_str() == query.category))
            .filter(|p| year.is_none_or(|r| p.year_of_manufacture().is_some_and(|y| r.contains(y))))
            .collect();
        let docs: Vec<Product> = matching
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
        Err(ApiError::Status {
            status: 405,
            body: String::new(),
        })
    }

    async fn product(&self, id: &ProductId) -> ApiResult<Product> {
        self.products
            .iter()
            .find(|p| p.id_typed() == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn web_text(&self) -> ApiResult<WebTextPlans> {
        let mut info = WebTextPlans {
            title: "Heavy Co".into(),
            archive_product_title: Some("All machines".into()),
            ..Default::default()
        };
        if self.archive_redirect {
            info.archive_product_redirect_status = Some(RedirectStatus::Code(301));
            info.archive_product_new_url = Some("/shop".into());
        }
        Ok(info)
    }

    async fn blog_post(&self, slug: &str) -> ApiResult<BlogPost> {
        match slug {
            "moved" => Ok(BlogPost {
                title: "Moved".into(),
                content: String::new(),
                author: None,
                created_at: None,
                image: None,
                seo_title: None,
                meta_data: None,
                canonical: None,
                redirect_status: Some(RedirectStatus::Text("302".into())),
                new_url: Some("/blog/new-home".into()),
            }),
            "broken" => Err(ApiError::Network("reset".into())),
            _ => Err(ApiError::NotFound),
        }
    }

    async fn brands(&self) -> ApiResult<Vec<Brand>> {
        Ok(vec![Brand::new("a", "A"), Brand::new("b", "B")])
    }
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(api: CannedCatalog) -> Self {
        let mut config = StorefrontConfig::new("https://api.example.com");
        config.app_url = "https://shop.example.com".into();
        config.page_size = 3;

        let app = build_app(AppState::new(Arc::new(api), config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;
    let res = client().get(format!("{}/health", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn archive_renders_first_page_with_facets() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;
    let res = client()
        .get(format!("{}/archive?sort=mostViewed", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["heading"], "All machines");
    assert_eq!(body["sort"], "mostViewed");
    assert_eq!(body["products"]["docs"].as_array().unwrap().len(), 3);
    assert_eq!(body["showing"], serde_json::json!({ "from": 1, "to": 3, "total": 7 }));
    assert_eq!(body["canLoadMore"], true);
    assert!(
        body["nextPageUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://api.example.com/product?")
    );
    assert!(body["nextPageUrl"].as_str().unwrap().contains("page=2"));

    let facet_ids: Vec<&str> = body["facets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert!(facet_ids.contains(&"brand"));
    assert!(!facet_ids.contains(&"model"));
}

#[tokio::test]
async fn archive_url_filters_reveal_dependent_facets() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;
    let body: serde_json::Value = client()
        .get(format!("{}/archive?limit=7&filter%5Bbrand%5D=A&inStock=true", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // p0 and p2 are brand A and in stock.
    assert_eq!(body["filteredCount"], 2);
    assert_eq!(body["inStockOnly"], true);
    assert_eq!(body["canLoadMore"], false);

    let facets = body["facets"].as_array().unwrap();
    let brand = facets.iter().find(|f| f["id"] == "brand").unwrap();
    assert_eq!(brand["open"], true);
    assert!(facets.iter().any(|f| f["id"] == "model"));
}

#[tokio::test]
async fn archive_url_year_range_keeps_facet_open() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;
    let body: serde_json::Value = client()
        .get(format!("{}/archive?limit=2&min%5Byear%5D=2016&max%5Byear%5D=2018", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // p1..p3 match upstream; the first page holds p1 and p2.
    assert_eq!(body["products"]["totalDocs"], 3);
    assert_eq!(body["filteredCount"], 2);
    assert_eq!(body["canLoadMore"], true);

    let year = body["facets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == "year")
        .unwrap();
    assert_eq!(year["open"], true);

    let next = body["nextPageUrl"].as_str().unwrap();
    assert!(next.contains("page=2"));
    assert!(next.contains("min%5Byear%5D=2016"));
    assert!(next.contains("max%5Byear%5D=2018"));
}

#[tokio::test]
async fn archive_redirect_is_permanent() {
    let mut api = CannedCatalog::new();
    api.archive_redirect = true;
    let srv = TestServer::spawn(api).await;

    let res = client().get(format!("{}/archive", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()["location"], "/shop");
}

#[tokio::test]
async fn category_archive_checks_the_category() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;

    let res = client().get(format!("{}/archive/c1", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["metadata"]["title"], "Buy excavators - Heavy Co");

    let res = client().get(format!("{}/archive/c9", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn blog_redirects_and_404s() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;

    let res = client().get(format!("{}/blog/moved", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/blog/new-home");

    for slug in ["missing", "broken"] {
        let res = client()
            .get(format!("{}/blog/{slug}", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn product_detail_includes_gallery() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;

    let res = client().get(format!("{}/product/p2", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["canInquire"], true);
    assert_eq!(body["imageUrls"].as_array().unwrap().len(), 5);
    assert_eq!(body["gallery"]["thumbnails"].as_array().unwrap().len(), 3);
    assert_eq!(body["gallery"]["overflow"], 2);
    assert_eq!(
        body["metadata"]["canonical"],
        "https://shop.example.com/product/p2"
    );

    let res = client().get(format!("{}/product/p99", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_selects_first_brand() {
    let srv = TestServer::spawn(CannedCatalog::new()).await;
    let body: serde_json::Value = client()
        .get(format!("{}/", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["selectedBrand"], "a");
    assert_eq!(body["brands"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["title"], "Heavy Co");
}
