//! Property sources
//!
//! The resolver never reads process globals directly. Environment variables and
//! embedded resources come from providers handed to it, so tests can supply
//! their own tables.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub mod properties;

pub use properties::{parse_properties, read_properties_file};

/// Flat key to value table produced by a file, resource or environment.
pub type PropertyMap = BTreeMap<String, String>;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from command-line arguments
    CommandLine,
    /// Value from the external property file
    PropertyFile(PathBuf),
    /// Value from environment variables, optionally filtered by a name prefix
    Environment(Option<String>),
    /// Value from an embedded resource
    Resource(String),
    /// Default value declared in the schema
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CommandLine => write!(f, "command line arguments"),
            ValueSource::PropertyFile(path) => write!(f, "external property file {}", path.display()),
            ValueSource::Environment(None) => write!(f, "environment"),
            ValueSource::Environment(Some(prefix)) => write!(f, "environment (prefix \"{}\")", prefix),
            ValueSource::Resource(name) => write!(f, "resource {}", name),
            ValueSource::Default => write!(f, "default values"),
        }
    }
}

/// Supplies environment variables.
pub trait EnvironmentProvider {
    fn vars(&self) -> Vec<(String, String)>;
}

/// Supplies embedded property resources by name.
///
/// `Ok(None)` means the resource does not exist.
pub trait ResourceProvider {
    fn load(&self, name: &str) -> Result<Option<PropertyMap>>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentProvider for ProcessEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        // Non-unicode entries can't name a property anyway.
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// A fixed environment table.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: Vec<(String, String)>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl EnvironmentProvider for MapEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        self.vars.clone()
    }
}

/// Resources held in memory as property-file text, e.g. from `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MapResources {
    texts: BTreeMap<String, String>,
}

impl MapResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(name.into(), text.into());
        self
    }
}

impl ResourceProvider for MapResources {
    fn load(&self, name: &str) -> Result<Option<PropertyMap>> {
        self.texts.get(name).map(|text| parse_properties(text)).transpose()
    }
}

/// Resources looked up as files relative to a base directory.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceProvider for DirResources {
    fn load(&self, name: &str) -> Result<Option<PropertyMap>> {
        read_properties_file(&self.root.join(name))
    }
}
