//! Site content: blog posts, site-wide text/SEO configuration, redirects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `redirectStatus` as stored upstream: a number on newer records, a string
/// (`"301"`) on records edited through the old admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RedirectStatus {
    Code(u16),
    Text(String),
}

impl RedirectStatus {
    pub fn code(&self) -> Option<u16> {
        match self {
            RedirectStatus::Code(c) => Some(*c),
            RedirectStatus::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whether the status is set at all (zero and blank mean unset).
    fn is_set(&self) -> bool {
        match self {
            RedirectStatus::Code(c) => *c != 0,
            RedirectStatus::Text(s) => !s.trim().is_empty() && s.trim() != "0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectKind {
    Permanent,
    Temporary,
}

/// A redirect the page layer must perform before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub kind: RedirectKind,
    pub location: String,
}

impl Redirect {
    /// Build a redirect from a resource's `redirectStatus` / `newUrl` pair.
    ///
    /// Both must be set; `301` is permanent, every other status temporary.
    pub fn from_fields(status: Option<&RedirectStatus>, new_url: Option<&str>) -> Option<Self> {
        let status = status.filter(|s| s.is_set())?;
        let location = new_url.map(str::trim).filter(|u| !u.is_empty())?;

        let kind = if status.code() == Some(301) {
            RedirectKind::Permanent
        } else {
            RedirectKind::Temporary
        };

        Some(Self {
            kind,
            location: location.to_string(),
        })
    }

    pub fn is_permanent(&self) -> bool {
        self.kind == RedirectKind::Permanent
    }
}

/// A blog post (`GET /blog/{slug}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    /// Post body as HTML.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_status: Option<RedirectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_url: Option<String>,
}

impl BlogPost {
    pub fn redirect(&self) -> Option<Redirect> {
        Redirect::from_fields(self.redirect_status.as_ref(), self.new_url.as_deref())
    }
}

/// A hero banner on the home/archive pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A header navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMenu {
    pub title: String,
    #[serde(default)]
    pub link: String,
}

/// Site-wide text and SEO configuration (`GET /web-text-plans`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebTextPlans {
    /// Site title, appended to every page title.
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_product_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_product_seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_product_meta_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_product_canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_product_redirect_status: Option<RedirectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_product_new_url: Option<String>,
    #[serde(default, alias = "bannerList")]
    pub banners: Vec<Banner>,
    #[serde(default, alias = "menuList")]
    pub menus: Vec<HeaderMenu>,
}

impl WebTextPlans {
    /// Redirect configured for the product archive page, if any.
    pub fn archive_redirect(&self) -> Option<Redirect> {
        Redirect::from_fields(
            self.archive_product_redirect_status.as_ref(),
            self.archive_product_new_url.as_deref(),
        )
    }
}
