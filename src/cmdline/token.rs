//! Tokenizer output: one key with an optional value per property

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// `--key` (or `/key` in Windows compatibility mode)
    Long(String),
    /// `-k`
    Short(char),
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKey::Long(key) => write!(f, "--{}", key),
            TokenKey::Short(c) => write!(f, "-{}", c),
        }
    }
}

/// A key as seen on the command line, with the value that came with it.
///
/// `explicit` is only ever true together with a value: it marks values
/// attached with `=` inside the key token rather than taken from the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenProperty {
    key: TokenKey,
    value: Option<String>,
    explicit: bool,
}

impl TokenProperty {
    /// `--key=value`
    pub fn explicit(key: TokenKey, value: impl Into<String>) -> Self {
        Self { key, value: Some(value.into()), explicit: true }
    }

    /// `--key value` or a bare `--key`
    pub fn adjacent(key: TokenKey, value: Option<String>) -> Self {
        Self { key, value, explicit: false }
    }

    pub fn key(&self) -> &TokenKey {
        &self.key
    }

    /// Key text without its prefix: the long key, or the char as a string.
    pub fn key_text(&self) -> String {
        match &self.key {
            TokenKey::Long(key) => key.clone(),
            TokenKey::Short(c) => c.to_string(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_explicitly_parametrized(&self) -> bool {
        self.explicit
    }
}

impl fmt::Display for TokenProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        match (&self.value, self.explicit) {
            (Some(value), true) => write!(f, "={}", value),
            (Some(value), false) => write!(f, " {}", value),
            (None, _) => Ok(()),
        }
    }
}

/// Ordered tokenizer output, plus the dangling tokens skipped in lenient mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    properties: Vec<TokenProperty>,
    dangling: Vec<String>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: TokenProperty) {
        self.properties.push(property);
    }

    pub(crate) fn push_dangling(&mut self, token: String) {
        self.dangling.push(token);
    }

    /// First property whose long key (or char, as a one-letter string) equals `key`.
    pub fn get(&self, key: &str) -> Option<&TokenProperty> {
        self.properties.iter().find(|p| p.key_text() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TokenProperty::value)
    }

    pub fn is_explicitly_parametrized(&self, key: &str) -> bool {
        self.get(key).is_some_and(TokenProperty::is_explicitly_parametrized)
    }

    pub fn dangling(&self) -> &[String] {
        &self.dangling
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenProperty> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Command-line words that tokenize back to the same properties.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.properties.len());
        for property in &self.properties {
            match (&property.value, property.explicit) {
                (Some(value), true) => args.push(format!("{}={}", property.key, value)),
                (Some(value), false) => {
                    args.push(property.key.to_string());
                    args.push(value.clone());
                }
                (None, _) => args.push(property.key.to_string()),
            }
        }
        args
    }
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, property) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", property)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a TokenProperty;
    type IntoIter = std::slice::Iter<'a, TokenProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

impl IntoIterator for TokenStream {
    type Item = TokenProperty;
    type IntoIter = std::vec::IntoIter<TokenProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}

impl FromIterator<TokenProperty> for TokenStream {
    fn from_iter<T: IntoIterator<Item = TokenProperty>>(iter: T) -> Self {
        Self { properties: iter.into_iter().collect(), dangling: Vec::new() }
    }
}
