//! Environment-driven configuration.

use reqwest::Url;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_APP_URL: &str = "http://localhost:3000";
const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Where the storefront finds its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Base URL of the remote catalog/content API.
    pub api_url: String,
    /// Public URL of the storefront itself (canonical links).
    pub app_url: String,
    /// Base URL images are served from.
    pub image_url: String,
    /// Products per listing page requested from the API.
    pub page_size: u32,
}

impl StorefrontConfig {
    /// Config pointing at `api_url` with every other value defaulted.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = trim_slash(api_url.into());
        Self {
            image_url: format!("{api_url}/images"),
            api_url,
            app_url: DEFAULT_APP_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Read `STOREFRONT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match non_empty(lookup("STOREFRONT_API_URL")) {
            Some(v) => url("STOREFRONT_API_URL", v)?,
            None => {
                tracing::warn!("STOREFRONT_API_URL not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        let app_url = match non_empty(lookup("STOREFRONT_APP_URL")) {
            Some(v) => url("STOREFRONT_APP_URL", v)?,
            None => DEFAULT_APP_URL.to_string(),
        };

        let image_url = match non_empty(lookup("STOREFRONT_IMAGE_URL")) {
            Some(v) => url("STOREFRONT_IMAGE_URL", v)?,
            None => format!("{api_url}/images"),
        };

        let page_size = match non_empty(lookup("STOREFRONT_PAGE_SIZE")) {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "STOREFRONT_PAGE_SIZE",
                        value: v,
                    });
                }
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            api_url,
            app_url,
            image_url,
            page_size,
        })
    }

    /// Absolute URL of an image path as stored on catalog records.
    pub fn image(&self, path: &str) -> String {
        format!("{}/{}", self.image_url, path.trim_start_matches('/'))
    }

    /// Absolute storefront URL of `path`.
    pub fn app_link(&self, path: &str) -> String {
        format!("{}/{}", self.app_url, path.trim_start_matches('/'))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn url(var: &'static str, value: String) -> Result<String, ConfigError> {
    match Url::parse(value.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trim_slash(value.trim().to_string())),
        _ => Err(ConfigError::InvalidUrl { var, value }),
    }
}

fn trim_slash(mut value: String) -> String {
    while value.ends_with('/') {
        value.pop();
    }
    value
}
