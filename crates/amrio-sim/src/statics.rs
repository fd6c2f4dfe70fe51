//! Run parameters and other metadata that is not geometry, field, or
//! scalar data.
//!
//! Values are grouped the way snapshot files group them ("integer runtime
//! parameters", "sim info", ...). Group and parameter labels are reduced on
//! insert: trailing whitespace is dropped and inner spaces become `_`, so
//! `"real runtime parameters"` is stored as `"real_runtime_parameters"`.

use amrio_core::{Named, ScalarValue};
use indexmap::IndexMap;

/// Reduce a decoded label to an identifier-like key.
pub fn reduce_label(label: &str) -> String {
    label.trim_end().replace(' ', "_")
}

/// One group of named parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterGroup {
    values: IndexMap<String, ScalarValue>,
}

impl ParameterGroup {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter under its reduced label.
    pub fn insert(&mut self, label: &str, value: impl Into<ScalarValue>) -> Option<ScalarValue> {
        self.values.insert(reduce_label(label), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, label: &str, value: impl Into<ScalarValue>) -> Self {
        self.insert(label, value);
        self
    }

    /// The parameter stored under `name`.
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.values.get(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in decoded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> + '_ {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<'s> FromIterator<(&'s str, ScalarValue)> for ParameterGroup {
    fn from_iter<I: IntoIterator<Item = (&'s str, ScalarValue)>>(iter: I) -> Self {
        let mut group = Self::new();
        for (label, value) in iter {
            group.insert(label, value);
        }
        group
    }
}

/// Group name → parameters for one timestep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticData {
    groups: IndexMap<String, ParameterGroup>,
}

impl StaticData {
    /// No groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a group under its reduced label.
    pub fn insert_group(&mut self, label: &str, group: ParameterGroup) -> Option<ParameterGroup> {
        self.groups.insert(reduce_label(label), group)
    }

    /// Builder form of [`insert_group`](Self::insert_group).
    pub fn with_group(mut self, label: &str, group: ParameterGroup) -> Self {
        self.insert_group(label, group);
        self
    }

    /// The group stored under `name`.
    pub fn group(&self, name: &str) -> Option<&ParameterGroup> {
        self.groups.get(name)
    }

    /// One parameter of one group.
    pub fn get(&self, group: &str, name: &str) -> Option<&ScalarValue> {
        self.group(group)?.get(name)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `(name, group)` pairs in decoded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterGroup)> + '_ {
        self.groups.iter().map(|(n, g)| (n.as_str(), g))
    }
}

impl Named for StaticData {
    type Item = ParameterGroup;

    fn lookup(&self, name: &str) -> Option<&ParameterGroup> {
        self.groups.get(name)
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.groups.keys().map(String::as_str))
    }
}
