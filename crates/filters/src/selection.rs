//! Filter selection store.
//!
//! Holds what the user picked per attribute, the in-stock toggle, and which
//! filter panel is expanded. Ranges that arrive from outside (URL parameters
//! the server already applied) are pinned so they keep going out on the wire
//! even when the loaded collection makes them look like the full range.
//! Every change that can affect filtering bumps
//! `revision`, which the view computer uses as its cache key.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::AttributeId;

use crate::attribute::{Attribute, NumericRange};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown attribute: {0}")]
    UnknownAttribute(AttributeId),
    #[error("attribute {attribute} is not a {expected} attribute")]
    KindMismatch {
        attribute: AttributeId,
        expected: &'static str,
    },
}

/// The user's choice for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Checked option values (string attributes).
    Options(BTreeSet<String>),
    /// Chosen sub-range (number attributes).
    Range(NumericRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    String,
    Number(NumericRange),
}

impl Shape {
    fn of(attribute: &Attribute) -> Self {
        match attribute.bounds() {
            Some(bounds) => Shape::Number(bounds),
            None => Shape::String,
        }
    }

    fn default_selection(&self) -> Selection {
        match self {
            Shape::String => Selection::Options(BTreeSet::new()),
            Shape::Number(bounds) => Selection::Range(*bounds),
        }
    }
}

/// Per-session filter state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    shapes: BTreeMap<AttributeId, Shape>,
    entries: BTreeMap<AttributeId, Selection>,
    pinned: BTreeMap<AttributeId, NumericRange>,
    in_stock_only: bool,
    open_panel: Option<usize>,
    revision: u64,
}

impl FilterSelection {
    /// Empty selection (no checked options, full ranges) for `attributes`.
    pub fn new(attributes: &[Attribute]) -> Self {
        let shapes: BTreeMap<AttributeId, Shape> = attributes
            .iter()
            .map(|a| (a.id.clone(), Shape::of(a)))
            .collect();
        let entries = default_entries(&shapes);

        Self {
            shapes,
            entries,
            pinned: BTreeMap::new(),
            in_stock_only: false,
            open_panel: None,
            revision: 0,
        }
    }

    /// Adopt freshly extracted attributes.
    ///
    /// Bounds are refreshed. A pinned range is re-clamped into the new bounds.
    /// Otherwise a range sitting at the old full range follows the new full
    /// range and a narrowed range is clamped into the new bounds. Checked
    /// options are kept even if the new collection no longer offers them.
    /// Selections for attributes that disappeared are dropped.
    pub fn sync_attributes(&mut self, attributes: &[Attribute]) {
        let mut shapes = BTreeMap::new();
        let mut entries = BTreeMap::new();

        for attribute in attributes {
            let shape = Shape::of(attribute);
            let previous_shape = self.shapes.get(&attribute.id).copied();
            let previous = self.entries.remove(&attribute.id);

            if shape == Shape::String {
                self.pinned.remove(&attribute.id);
            }
            let pin = self.pinned.get(&attribute.id).copied();

            let entry = match (shape, pin, previous_shape, previous) {
                (Shape::Number(bounds), Some(pin), _, _) => Selection::Range(bounds.clamp(pin)),
                (Shape::String, _, Some(Shape::String), Some(sel @ Selection::Options(_))) => sel,
                (Shape::Number(bounds), None, Some(Shape::Number(old)), Some(Selection::Range(r))) => {
                    if r == old {
                        Selection::Range(bounds)
                    } else {
                        Selection::Range(bounds.clamp(r))
                    }
                }
                _ => shape.default_selection(),
            };

            shapes.insert(attribute.id.clone(), shape);
            entries.insert(attribute.id.clone(), entry);
        }

        self.shapes = shapes;
        self.entries = entries;
        self.bump();
    }

    /// Flip membership of `value` in the checked set of a string attribute.
    ///
    /// Number or unknown attributes are left untouched; the misuse is logged in
    /// debug builds and reported through the error.
    pub fn toggle_option(&mut self, attribute: &AttributeId, value: &str) -> Result<(), SelectionError> {
        match self.shapes.get(attribute) {
            None => return Err(misuse(SelectionError::UnknownAttribute(attribute.clone()))),
            Some(Shape::Number(_)) => {
                return Err(misuse(SelectionError::KindMismatch {
                    attribute: attribute.clone(),
                    expected: "string",
                }));
            }
            Some(Shape::String) => {}
        }

        let entry = self
            .entries
            .entry(attribute.clone())
            .or_insert_with(|| Selection::Options(BTreeSet::new()));

        if let Selection::Options(checked) = entry {
            if !checked.remove(value) {
                checked.insert(value.to_string());
            }
        }

        self.bump();
        Ok(())
    }

    /// Set the chosen sub-range of a number attribute.
    ///
    /// Out-of-bounds ends are clamped to the observed bounds rather than
    /// rejected; reversed ends are swapped. Returns the range actually stored.
    pub fn set_range(
        &mut self,
        attribute: &AttributeId,
        requested: NumericRange,
    ) -> Result<NumericRange, SelectionError> {
        let bounds = match self.shapes.get(attribute) {
            None => return Err(misuse(SelectionError::UnknownAttribute(attribute.clone()))),
            Some(Shape::String) => {
                return Err(misuse(SelectionError::KindMismatch {
                    attribute: attribute.clone(),
                    expected: "number",
                }));
            }
            Some(Shape::Number(bounds)) => *bounds,
        };

        let stored = bounds.clamp(requested);
        let unpinned = self.pinned.remove(attribute).is_some();
        let previous = self.entries.insert(attribute.clone(), Selection::Range(stored));
        if unpinned || previous != Some(Selection::Range(stored)) {
            self.bump();
        }
        Ok(stored)
    }

    /// Pin a range requested from outside the loaded collection.
    ///
    /// The pinned range is what [`Self::requested_range`] reports until the
    /// user sets the range or clears the selection. The stored range is the
    /// pin clamped into the observed bounds and follows every sync. An
    /// attribute not observed yet keeps its pin until it shows up.
    pub fn pin_range(&mut self, attribute: &AttributeId, requested: NumericRange) -> Result<(), SelectionError> {
        let requested = NumericRange::new(requested.min, requested.max);
        match self.shapes.get(attribute) {
            Some(Shape::String) => {
                return Err(misuse(SelectionError::KindMismatch {
                    attribute: attribute.clone(),
                    expected: "number",
                }));
            }
            Some(Shape::Number(bounds)) => {
                self.entries
                    .insert(attribute.clone(), Selection::Range(bounds.clamp(requested)));
            }
            None => {}
        }
        self.pinned.insert(attribute.clone(), requested);
        self.bump();
        Ok(())
    }

    /// The range to ask the server for: the pin if there is one, else the
    /// stored range.
    pub fn requested_range(&self, attribute: &AttributeId) -> Option<NumericRange> {
        self.pinned.get(attribute).copied().or_else(|| self.range(attribute))
    }

    /// Pinned ranges whose attribute the loaded collection does not carry.
    pub fn unobserved_pins(&self) -> impl Iterator<Item = (&AttributeId, NumericRange)> {
        self.pinned
            .iter()
            .filter(|(id, _)| !self.shapes.contains_key(*id))
            .map(|(id, range)| (id, *range))
    }

    pub fn set_in_stock_only(&mut self, in_stock_only: bool) {
        if self.in_stock_only != in_stock_only {
            self.in_stock_only = in_stock_only;
            self.bump();
        }
    }

    /// Reset every attribute to "no selection" and the in-stock toggle to off.
    ///
    /// The cleared state is built first and swapped in whole.
    pub fn clear(&mut self) {
        self.entries = default_entries(&self.shapes);
        self.pinned.clear();
        self.in_stock_only = false;
        self.bump();
    }

    /// Expand panel `index`, or collapse it when it is already the open one.
    pub fn toggle_open_panel(&mut self, index: usize) {
        self.open_panel = if self.open_panel == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn open_panel(&self) -> Option<usize> {
        self.open_panel
    }

    /// Whether the panel at `index` (showing `attribute`) is expanded. Panels
    /// with an active selection stay open regardless of the toggle.
    pub fn is_panel_open(&self, index: usize, attribute: &Attribute) -> bool {
        self.open_panel == Some(index) || self.is_active(&attribute.id)
    }

    pub fn in_stock_only(&self) -> bool {
        self.in_stock_only
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, attribute: &AttributeId) -> Option<&Selection> {
        self.entries.get(attribute)
    }

    pub fn checked(&self, attribute: &AttributeId) -> Option<&BTreeSet<String>> {
        match self.entries.get(attribute)? {
            Selection::Options(checked) => Some(checked),
            Selection::Range(_) => None,
        }
    }

    pub fn is_checked(&self, attribute: &AttributeId, value: &str) -> bool {
        self.checked(attribute).is_some_and(|c| c.contains(value))
    }

    pub fn range(&self, attribute: &AttributeId) -> Option<NumericRange> {
        match self.entries.get(attribute)? {
            Selection::Range(r) => Some(*r),
            Selection::Options(_) => None,
        }
    }

    /// Observed bounds of a number attribute, as last synced.
    pub fn bounds(&self, attribute: &AttributeId) -> Option<NumericRange> {
        match self.shapes.get(attribute)? {
            Shape::Number(bounds) => Some(*bounds),
            Shape::String => None,
        }
    }

    /// Non-empty checked set, a pinned range, or a range narrower than the
    /// observed bounds.
    pub fn is_active(&self, attribute: &AttributeId) -> bool {
        if self.pinned.contains_key(attribute) {
            return true;
        }
        match (self.entries.get(attribute), self.shapes.get(attribute)) {
            (Some(Selection::Options(checked)), _) => !checked.is_empty(),
            (Some(Selection::Range(r)), Some(Shape::Number(bounds))) => r != bounds,
            _ => false,
        }
    }

    /// Whether the attribute's prerequisite (if any) has an active selection.
    pub fn prerequisite_met(&self, attribute: &Attribute) -> bool {
        attribute.dependency().is_none_or(|dep| self.is_active(dep))
    }

    /// Whether `attribute` should be rendered at all.
    pub fn is_visible(&self, attribute: &Attribute) -> bool {
        self.prerequisite_met(attribute)
    }

    /// Whether `attribute` takes part in filtering: it is active and its
    /// prerequisite is active too. Stale selections behind an inactive
    /// prerequisite are ignored.
    pub fn is_effective(&self, attribute: &Attribute) -> bool {
        self.is_active(&attribute.id) && self.prerequisite_met(attribute)
    }

    /// Attributes with an active selection, in id order.
    pub fn active(&self) -> impl Iterator<Item = (&AttributeId, &Selection)> {
        self.entries.iter().filter(|(id, _)| self.is_active(id))
    }

    /// True when nothing narrows the collection.
    pub fn is_empty(&self) -> bool {
        !self.in_stock_only && self.pinned.is_empty() && self.active().next().is_none()
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn default_entries(shapes: &BTreeMap<AttributeId, Shape>) -> BTreeMap<AttributeId, Selection> {
    shapes
        .iter()
        .map(|(id, shape)| (id.clone(), shape.default_selection()))
        .collect()
}

fn misuse(err: SelectionError) -> SelectionError {
    if cfg!(debug_assertions) {
        tracing::warn!(error = %err, "filter selection call ignored");
    }
    err
}
