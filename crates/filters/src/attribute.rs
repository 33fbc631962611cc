//! Filter attribute descriptors and the schema that designates filterable fields.

use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;

use storefront_catalog::ProductField;
use storefront_core::{AttributeId, DomainError, DomainResult};

/// Inclusive integer range. `min <= max` whenever built through [`NumericRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

impl NumericRange {
    /// Build a range, swapping the ends if they arrive reversed.
    pub fn new(a: i64, b: i64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// A single-point range (nothing to slide).
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Clamp both ends of `requested` into `self`, then normalize the order.
    pub fn clamp(&self, requested: NumericRange) -> NumericRange {
        let lo = requested.min.clamp(self.min, self.max);
        let hi = requested.max.clamp(self.min, self.max);
        NumericRange::new(lo, hi)
    }
}

/// One enumerated value of a string attribute and how many products carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeKind {
    /// Enumerated options ordered by value.
    String { options: Vec<OptionCount> },
    /// Observed bounds; an attribute with no observed values reports `[0, 0]`.
    Number { min: i64, max: i64, step: i64 },
}

/// A filter facet derived from a product collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: AttributeId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_attribute: Option<AttributeId>,
    pub source: ProductField,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl Attribute {
    /// The prerequisite attribute, if any. A self-reference is no dependency.
    pub fn dependency(&self) -> Option<&AttributeId> {
        self.required_attribute.as_ref().filter(|dep| **dep != self.id)
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, AttributeKind::Number { .. })
    }

    /// Observed bounds for number attributes.
    pub fn bounds(&self) -> Option<NumericRange> {
        match self.kind {
            AttributeKind::Number { min, max, .. } => Some(NumericRange::new(min, max)),
            AttributeKind::String { .. } => None,
        }
    }

    pub fn options(&self) -> &[OptionCount] {
        match &self.kind {
            AttributeKind::String { options } => options,
            AttributeKind::Number { .. } => &[],
        }
    }

    /// True when there is nothing to choose from (no options / single point).
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            AttributeKind::String { options } => options.is_empty(),
            AttributeKind::Number { min, max, .. } => min == max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FacetKind {
    String,
    /// `step` is the slider granularity handed to the presentation layer.
    Number { step: i64 },
}

/// Designates one product field as filterable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetDefinition {
    pub id: AttributeId,
    pub title: String,
    pub source: ProductField,
    pub kind: FacetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_attribute: Option<AttributeId>,
}

impl FacetDefinition {
    pub fn string(id: &str, title: impl Into<String>, source: ProductField) -> Self {
        Self {
            id: AttributeId::new(id),
            title: title.into(),
            source,
            kind: FacetKind::String,
            required_attribute: None,
        }
    }

    pub fn number(id: &str, title: impl Into<String>, source: ProductField, step: i64) -> Self {
        Self {
            id: AttributeId::new(id),
            title: title.into(),
            source,
            kind: FacetKind::Number { step: step.max(1) },
            required_attribute: None,
        }
    }

    /// Only show this facet once `prerequisite` has an active selection.
    pub fn requires(mut self, prerequisite: &str) -> Self {
        self.required_attribute = Some(AttributeId::new(prerequisite));
        self
    }
}

/// Ordered list of filterable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSchema {
    definitions: Vec<FacetDefinition>,
}

impl FacetSchema {
    pub fn new(definitions: Vec<FacetDefinition>) -> Self {
        Self { definitions }
    }

    /// Build a schema from externally supplied definitions.
    ///
    /// Ids must be unique and every prerequisite must name another facet of
    /// the schema (a self-reference is accepted and means "no dependency").
    pub fn try_new(definitions: Vec<FacetDefinition>) -> DomainResult<Self> {
        let mut seen = BTreeSet::new();
        for def in &definitions {
            if !seen.insert(&def.id) {
                return Err(DomainError::validation(format!("duplicate facet id `{}`", def.id)));
            }
        }
        for def in &definitions {
            if let Some(dep) = &def.required_attribute {
                if !seen.contains(dep) {
                    return Err(DomainError::validation(format!(
                        "facet `{}` requires unknown facet `{dep}`",
                        def.id
                    )));
                }
            }
        }
        Ok(Self { definitions })
    }

    /// The machinery storefront's facets: the model facet only appears once a
    /// brand is picked, and years slide one at a time.
    pub fn storefront_default() -> Self {
        Self::new(vec![
            FacetDefinition::string("category", "Category", ProductField::Category),
            FacetDefinition::string("brand", "Brand", ProductField::Brand),
            FacetDefinition::string("model", "Model", ProductField::Option).requires("brand"),
            FacetDefinition::string("country", "Country of manufacture", ProductField::Country),
            FacetDefinition::string("condition", "Condition", ProductField::Condition),
            FacetDefinition::number(
                "year",
                "Year of manufacture",
                ProductField::YearOfManufacture,
                1,
            ),
        ])
    }

    pub fn definitions(&self) -> &[FacetDefinition] {
        &self.definitions
    }
}

impl Default for FacetSchema {
    fn default() -> Self {
        Self::storefront_default()
    }
}
