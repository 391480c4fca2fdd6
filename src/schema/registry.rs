//! Registry of property definitions
//!
//! Names are compared through a canonical form fixed when the registry is
//! created: the name itself for case-sensitive registries, its lowercase form
//! otherwise. The same canonicalization is applied on insertion and lookup.

use super::definition::PropertyDefinition;
use crate::cmdline::{TokenKey, TokenProperty};
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    case_sensitive: bool,
    entries: BTreeMap<String, PropertyDefinition>,
}

impl PropertyRegistry {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive, entries: BTreeMap::new() }
    }

    pub fn case_insensitive() -> Self {
        Self::new(false)
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn canonical<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_lowercase())
        }
    }

    pub fn names_match(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    /// Add a definition under its own name, returning any definition it replaced.
    pub fn register(&mut self, definition: PropertyDefinition) -> Option<PropertyDefinition> {
        let key = self.canonical(definition.name()).into_owned();
        let replaced = self.entries.insert(key, definition);
        if let Some(old) = &replaced {
            tracing::warn!("Property \"{}\" was registered twice, keeping the latest", old.name());
        }
        replaced
    }

    /// Look up a definition by its canonical name only (no aliases).
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.entries.get(&*self.canonical(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve a command-line token to its definition.
    ///
    /// Long keys match a definition name or one of its long aliases; short keys
    /// match only char aliases, compared exactly.
    pub fn resolve(&self, token: &TokenProperty) -> Option<&PropertyDefinition> {
        match token.key() {
            TokenKey::Long(key) => self.get(key).or_else(|| {
                self.entries
                    .values()
                    .find(|def| def.long_aliases().any(|alias| self.names_match(alias, key)))
            }),
            TokenKey::Short(c) => self.entries.values().find(|def| def.char_alias() == Some(*c)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<PropertyDefinition> for PropertyRegistry {
    fn extend<T: IntoIterator<Item = PropertyDefinition>>(&mut self, iter: T) {
        for definition in iter {
            self.register(definition);
        }
    }
}
