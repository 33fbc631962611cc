//! Product categories.

use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, Entity};

/// A category as returned by `GET /category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<String>,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The short category reference embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    #[serde(default)]
    pub title: String,
}

impl CategoryRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            title: title.into(),
        }
    }
}

/// Response of `GET /category`: normally `{ "categories": [...] }`, but older
/// deployments return the bare array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryList {
    Wrapped { categories: Vec<Category> },
    Bare(Vec<Category>),
}

impl CategoryList {
    pub fn into_vec(self) -> Vec<Category> {
        match self {
            CategoryList::Wrapped { categories } => categories,
            CategoryList::Bare(categories) => categories,
        }
    }
}

/// Find a category by id.
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id.as_str() == id)
}
