//! The resolved property map

use super::coerce;
use crate::error::Result;
use crate::sources::ValueSource;
use std::collections::BTreeMap;

/// One resolved property with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    /// Definition name, as declared in the schema
    pub name: String,
    /// `None` for a parameterless property that was merely present
    pub value: Option<String>,
    pub source: ValueSource,
}

/// Name to value map built by first-writer-wins across ranked sources.
///
/// Lookups use the same case rule as the registry the values were resolved against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedProperties {
    case_sensitive: bool,
    entries: BTreeMap<String, ResolvedProperty>,
}

impl ResolvedProperties {
    pub(crate) fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive, entries: BTreeMap::new() }
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Record a value unless the name is already set. Returns whether it was recorded.
    pub(crate) fn insert(&mut self, name: &str, value: Option<String>, source: ValueSource) -> bool {
        let key = self.key(name);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, ResolvedProperty { name: name.to_string(), value, source });
        true
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<ResolvedProperty> {
        let key = self.key(name);
        self.entries.remove(&key)
    }

    pub fn property(&self, name: &str) -> Option<&ResolvedProperty> {
        self.entries.get(&self.key(name))
    }

    /// Whether the property was resolved at all, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Whether the property was resolved and carries a value.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|p| p.value.as_deref())
    }

    pub fn source_of(&self, name: &str) -> Option<&ValueSource> {
        self.property(name).map(|p| &p.source)
    }

    /// Absent properties read as false, a bare flag as true.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.property(name) {
            None => Ok(false),
            Some(ResolvedProperty { value: None, .. }) => Ok(true),
            Some(ResolvedProperty { value: Some(value), name, .. }) => coerce::parse_bool(name, value),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        self.property(name)
            .and_then(|p| p.value.as_deref().map(|v| coerce::parse_int(&p.name, v)))
            .transpose()
    }

    pub fn get_float(&self, name: &str) -> Result<Option<f64>> {
        self.property(name)
            .and_then(|p| p.value.as_deref().map(|v| coerce::parse_float(&p.name, v)))
            .transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain name to value map, keyed by declared names.
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        self.iter().map(|p| (p.name.clone(), p.value.clone())).collect()
    }
}
