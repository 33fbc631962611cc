use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use storefront_core::{Entity, ProductId};

use crate::brand::{Brand, Country};
use crate::category::CategoryRef;

/// Free-form attribute value attached to a product (`attributes` map).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(i64),
    Text(String),
}

/// A catalog item.
///
/// Owned by the remote API; the storefront only reads it. Construct test
/// fixtures with [`Product::new`] and the `with_*` helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    id: ProductId,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translated_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    brand: Option<Brand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<Country>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    year_of_manufacture: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    #[serde(default)]
    available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_image: Option<String>,
    #[serde(default)]
    gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, AttributeValue>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            title: title.into(),
            translated_title: None,
            category: None,
            brand: None,
            country: None,
            year_of_manufacture: None,
            condition: None,
            available: false,
            option: None,
            primary_image: None,
            gallery: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: CategoryRef) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = Some(brand);
        self
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year_of_manufacture = Some(year);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = Some(option.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn with_gallery(mut self, gallery: Vec<String>) -> Self {
        self.gallery = gallery;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title to show to users: the translated title when the API provides one.
    pub fn display_title(&self) -> &str {
        match self.translated_title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.title,
        }
    }

    pub fn category(&self) -> Option<&CategoryRef> {
        self.category.as_ref()
    }

    pub fn brand(&self) -> Option<&Brand> {
        self.brand.as_ref()
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    pub fn year_of_manufacture(&self) -> Option<i64> {
        self.year_of_manufacture
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// In-stock flag. Unavailable products are listed but cannot be inquired.
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn option(&self) -> Option<&str> {
        self.option.as_deref()
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.primary_image.as_deref()
    }

    pub fn gallery(&self) -> &[String] {
        &self.gallery
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A product value read through a [`ProductField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(i64),
}

/// Product fields that can back a filter facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductField {
    /// Category title.
    Category,
    /// Brand title.
    Brand,
    /// Country title.
    Country,
    Condition,
    /// The free-text option string (model/variant).
    Option,
    YearOfManufacture,
    /// A key of the product's free-form `attributes` map.
    Custom(String),
}

impl ProductField {
    /// Read this field from a product. Blank strings count as missing.
    pub fn value<'a>(&self, product: &'a Product) -> Option<FieldValue<'a>> {
        let text = match self {
            ProductField::Category => product.category.as_ref().map(|c| c.title.as_str()),
            ProductField::Brand => product.brand.as_ref().map(|b| b.title.as_str()),
            ProductField::Country => product.country.as_ref().map(|c| c.title.as_str()),
            ProductField::Condition => product.condition.as_deref(),
            ProductField::Option => product.option.as_deref(),
            ProductField::YearOfManufacture => {
                return product.year_of_manufacture.map(FieldValue::Number);
            }
            ProductField::Custom(key) => {
                return match product.attributes.get(key)? {
                    AttributeValue::Number(n) => Some(FieldValue::Number(*n)),
                    AttributeValue::Text(s) if !s.trim().is_empty() => Some(FieldValue::Text(s.as_str())),
                    AttributeValue::Text(_) => None,
                };
            }
        };

        text.filter(|s| !s.trim().is_empty()).map(FieldValue::Text)
    }

    /// Read this field as text. Numbers are rendered in decimal.
    pub fn text(&self, product: &Product) -> Option<String> {
        self.value(product).map(|v| match v {
            FieldValue::Text(s) => s.to_string(),
            FieldValue::Number(n) => n.to_string(),
        })
    }

    /// Read this field as a number. Numeric text is parsed.
    pub fn number(&self, product: &Product) -> Option<i64> {
        match self.value(product)? {
            FieldValue::Number(n) => Some(n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}
