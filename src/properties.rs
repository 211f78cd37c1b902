//! # Filter Properties
//!
//! Declarative, host-editable configuration values for filter components.
//!
//! A filter type declares its properties once as an ordered set of
//! `(name, label, default)` triples. The `label` is what the host editor
//! shows the user; the `name` is what filter code reads at runtime. When the
//! host attaches a component it resolves every label to a concrete value and
//! hands the result back as [`ResolvedArgs`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

// ============================================================================
// Property Values
// ============================================================================

/// Value variants a filter property can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    /// RGB color, components in the 0.0-1.0 range
    Color3([f32; 3]),
    /// RGBA color, components in the 0.0-1.0 range
    Color4([f32; 4]),
    String(String),
}

// ============================================================================
// Declarations
// ============================================================================

/// A single property declaration: host-facing label plus default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterProperty {
    pub label: String,
    pub default: PropertyValue,
}

impl FilterProperty {
    pub fn new(label: impl Into<String>, default: PropertyValue) -> Self {
        Self {
            label: label.into(),
            default,
        }
    }
}

/// Property metadata handed to the host editor: the user-visible label and
/// the value the field starts out with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub label: String,
    pub default: PropertyValue,
}

// ============================================================================
// Property Set
// ============================================================================

/// Ordered table of property declarations for one filter type.
///
/// Built once per type by [`ScreenFilter::properties`]. Re-declaring a name
/// replaces its value but keeps the original position, so a derived table
/// reads base-first with overrides applied in place.
///
/// [`ScreenFilter::properties`]: crate::component::ScreenFilter::properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    entries: Vec<(String, FilterProperty)>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declarations shared by every screen filter.
    ///
    /// `pass_index` orders the pass among the scene's active filters.
    pub fn screen_filter_base() -> Self {
        Self::new().declare("pass_index", "Pass Index", PropertyValue::Int(0))
    }

    /// Declare (or re-declare) a property under `name`.
    pub fn declare(mut self, name: &str, label: &str, default: PropertyValue) -> Self {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(n, _)| n == name) {
            *slot = FilterProperty::new(label, default);
        } else {
            self.entries
                .push((name.to_string(), FilterProperty::new(label, default)));
        }
        self
    }

    /// Overlay every declaration from `other` onto this set.
    ///
    /// When several tables are combined, the last overlay wins.
    pub fn extend_with(mut self, other: &PropertySet) -> Self {
        for (name, property) in &other.entries {
            self = self.declare(name, &property.label, property.default.clone());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FilterProperty> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, property)| property)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations in order, as `(name, property)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterProperty)> {
        self.entries
            .iter()
            .map(|(name, property)| (name.as_str(), property))
    }

    /// Host-facing schema: labels with their defaults, in declaration order.
    pub fn descriptors(&self) -> Vec<PropertyDescriptor> {
        self.entries
            .iter()
            .map(|(_, property)| PropertyDescriptor {
                label: property.label.clone(),
                default: property.default.clone(),
            })
            .collect()
    }
}

// ============================================================================
// Resolved Arguments
// ============================================================================

/// Concrete property values supplied by the host, keyed by label.
///
/// Not validated against any [`PropertySet`]; a mismatch between what the
/// host resolved and what a filter declared surfaces as
/// [`FilterError::Unresolved`] at access time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedArgs {
    values: HashMap<String, PropertyValue>,
}

impl ResolvedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declared property of `set` at its default value.
    pub fn from_defaults(set: &PropertySet) -> Self {
        let mut args = Self::new();
        for (_, property) in set.iter() {
            args.set(&property.label, property.default.clone());
        }
        args
    }

    pub fn set(&mut self, label: &str, value: PropertyValue) {
        self.values.insert(label.to_string(), value);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, label: &str, value: PropertyValue) -> Self {
        self.set(label, value);
        self
    }

    pub fn get(&self, label: &str) -> Option<&PropertyValue> {
        self.values.get(label)
    }

    /// Look `name` up through the declaration table.
    ///
    /// The declaration maps the name to its label; the resolved value for
    /// that label is returned. Undeclared names and labels the host never
    /// resolved both fail.
    pub fn lookup<'a>(
        &'a self,
        set: &PropertySet,
        name: &str,
    ) -> Result<&'a PropertyValue, FilterError> {
        let property = set
            .get(name)
            .ok_or_else(|| FilterError::UnknownProperty(name.to_string()))?;
        self.values
            .get(&property.label)
            .ok_or_else(|| FilterError::Unresolved(property.label.clone()))
    }
}
