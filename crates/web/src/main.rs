use std::sync::Arc;

use anyhow::Context;

use storefront_client::{HttpCatalogClient, StorefrontConfig};
use storefront_web::app::{AppState, build_app};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = StorefrontConfig::from_env().context("invalid storefront configuration")?;
    let api = HttpCatalogClient::new(&config.api_url).context("invalid catalog API URL")?;

    let bind_addr = std::env::var("STOREFRONT_BIND_ADDR").unwrap_or_else(|_| {
        tracing::warn!("STOREFRONT_BIND_ADDR not set; using {DEFAULT_BIND_ADDR}");
        DEFAULT_BIND_ADDR.to_string()
    });

    tracing::info!(api_url = %config.api_url, app_url = %config.app_url, "starting storefront");
    let app = build_app(AppState::new(Arc::new(api), config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
