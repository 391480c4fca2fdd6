//! Schema loading from YAML
//!
//! A schema document maps property names to definition fields, either at the
//! top level or under a single `properties` section. Entries may omit `name`;
//! the map key is used then. When a `name` is present it must agree with the
//! key up to case and separators.

use super::definition::{ParamType, Parametrization, PropertyDefinition};
use super::registry::PropertyRegistry;
use crate::error::{PropertyError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const NESTED_SECTION: &str = "properties";

/// A definition as written in a schema file, before its name is settled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionDraft {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "default_Value")]
    default_value: Option<String>,
    #[serde(default, alias = "parametrized")]
    parametrization: Option<Parametrization>,
    #[serde(default, alias = "is_required")]
    required: bool,
    #[serde(default)]
    param_type: Option<ParamType>,
    #[serde(default, alias = "long_aliases")]
    cmd_aliases: Vec<String>,
    #[serde(default, alias = "char_alias")]
    char_cmd_alias: Option<char>,
}

impl DefinitionDraft {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Give a nameless draft its name. A draft that already has one keeps it.
    pub fn named(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Some(existing) = &self.name {
            return Err(PropertyError::ImmutableNameReassignment {
                name: existing.clone(),
                attempted: name,
            });
        }
        self.name = Some(name);
        Ok(self)
    }

    pub fn into_definition(self) -> Result<PropertyDefinition> {
        let name = self.name.ok_or_else(|| PropertyError::InvalidDefinition {
            name: String::new(),
            reason: "name must not be empty".to_string(),
        })?;

        PropertyDefinition::builder(name)
            .description(self.description.as_deref())
            .maybe_default_value(self.default_value)
            .parametrization(self.parametrization.unwrap_or(Parametrization::Optional))
            .required(self.required)
            .maybe_param_type(self.param_type)
            .long_aliases(self.cmd_aliases)
            .maybe_char_alias(self.char_cmd_alias)
            .build()
    }
}

/// Letters and digits only, lowercased.
fn alphanumeric_core(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// Settle every draft's name against its schema key and build the registry.
pub fn adjust_names<I>(drafts: I, case_sensitive: bool) -> Result<PropertyRegistry>
where
    I: IntoIterator<Item = (String, DefinitionDraft)>,
{
    let mut registry = PropertyRegistry::new(case_sensitive);
    for (key, draft) in drafts {
        let draft = match draft.name() {
            None => draft.named(key.clone())?,
            Some(name) if alphanumeric_core(name) == alphanumeric_core(&key) => {
                if name != key {
                    tracing::debug!("Property \"{}\" is re-keyed under its own name \"{}\"", key, name);
                }
                draft
            }
            Some(name) => {
                return Err(PropertyError::NameMismatch { key, name: name.to_string() });
            }
        };
        let definition = draft.into_definition()?;
        if registry.contains(definition.name()) {
            return Err(PropertyError::DuplicateDefinition { name: definition.name().to_string(), key });
        }
        registry.register(definition);
    }
    Ok(registry)
}

/// Parse a YAML schema, supporting a nested `properties` section.
pub fn parse_yaml_schema(content: &str, case_sensitive: bool) -> Result<PropertyRegistry> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)?;

    let schema_val = match raw.as_mapping() {
        Some(map) if map.len() == 1 && map.contains_key(NESTED_SECTION) => {
            map.get(NESTED_SECTION).cloned().unwrap_or_default()
        }
        _ => raw,
    };

    // An empty document is an empty schema.
    if schema_val.is_null() {
        return Ok(PropertyRegistry::new(case_sensitive));
    }

    let drafts: BTreeMap<String, DefinitionDraft> = serde_yaml::from_value(schema_val)?;
    adjust_names(drafts, case_sensitive)
}

pub fn load_yaml_schema(path: &Path, case_sensitive: bool) -> Result<PropertyRegistry> {
    let content = fs::read_to_string(path)
        .map_err(|source| PropertyError::Io { path: path.to_path_buf(), source })?;
    let registry = parse_yaml_schema(&content, case_sensitive)?;
    tracing::debug!("Loaded {} property definitions from {}", registry.len(), path.display());
    Ok(registry)
}

impl PropertyRegistry {
    pub fn from_yaml_str(content: &str, case_sensitive: bool) -> Result<Self> {
        parse_yaml_schema(content, case_sensitive)
    }

    pub fn from_yaml_file(path: &Path, case_sensitive: bool) -> Result<Self> {
        load_yaml_schema(path, case_sensitive)
    }

    /// Serialize the schema back to YAML, keyed by property name.
    pub fn to_yaml_string(&self) -> Result<String> {
        let by_name: BTreeMap<&str, &PropertyDefinition> =
            self.iter().map(|def| (def.name(), def)).collect();
        Ok(serde_yaml::to_string(&by_name)?)
    }
}
