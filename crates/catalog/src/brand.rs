//! Brands and countries of manufacture.

use serde::{Deserialize, Serialize};

use storefront_core::{BrandId, CountryId, Entity};

/// A brand as returned by `GET /brand` and embedded in products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: BrandId,
    #[serde(default)]
    pub title: String,
    /// Latin-script name, used as image alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Brand {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: BrandId::new(id),
            title: title.into(),
            en_title: None,
            logo: None,
        }
    }
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Country of manufacture embedded in products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "_id")]
    pub id: CountryId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Country {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: CountryId::new(id),
            title: title.into(),
            logo: None,
        }
    }
}
