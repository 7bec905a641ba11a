// SPDX-License-Identifier: GPL-3.0-only

//! Raw device registry snapshot
//!
//! The registry keeps the platform's own property names. Only a handful of
//! well-known keys are interpreted by the arbiter; everything else is carried
//! along untouched for callers that want it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known registry property keys.
pub mod keys {
    pub const BSD_NAME: &str = "BSD Name";
    pub const LEAF: &str = "Leaf";
    pub const WHOLE: &str = "Whole";
    pub const CONTENT: &str = "Content";
    pub const SIZE: &str = "Size";
    pub const WRITABLE: &str = "Writable";
}

/// A single raw property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One registered block device node and its raw properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub bsd_name: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl RegistryEntry {
    pub fn new(bsd_name: impl Into<String>) -> Self {
        let bsd_name = bsd_name.into();
        let mut properties = BTreeMap::new();
        properties.insert(
            keys::BSD_NAME.to_string(),
            PropertyValue::String(bsd_name.clone()),
        );
        Self {
            bsd_name,
            properties,
        }
    }

    /// Builder-style property setter.
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.properties.get(key)? {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.properties.get(key)? {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Integer(i) => Some(*i != 0),
            PropertyValue::String(_) => None,
        }
    }

    /// Whether the registry marks this node as a leaf (no child media).
    pub fn is_leaf(&self) -> bool {
        self.flag(keys::LEAF).unwrap_or(false)
    }
}

/// Ordered registry contents as enumerated by the platform.
///
/// Insertion order is preserved and duplicate names are kept as reported;
/// consumers decide how to deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    entries: Vec<RegistryEntry>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RegistryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// First entry registered under `bsd_name`.
    pub fn get(&self, bsd_name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.bsd_name == bsd_name)
    }

    pub fn contains(&self, bsd_name: &str) -> bool {
        self.get(bsd_name).is_some()
    }

    /// BSD names in registry order, duplicates included.
    pub fn bsd_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.bsd_name.as_str())
    }
}

impl FromIterator<RegistryEntry> for RegistrySnapshot {
    fn from_iter<I: IntoIterator<Item = RegistryEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RegistrySnapshot {
    type Item = RegistryEntry;
    type IntoIter = std::vec::IntoIter<RegistryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
