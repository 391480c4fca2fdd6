//! Property definitions
//!
//! A definition describes one expected property: its name, whether and how it
//! takes a value, the value type, and its command-line aliases. Definitions are
//! validated once, in [`DefinitionBuilder::build`], and are immutable afterwards.

use crate::error::{PropertyError, Result};
use crate::resolve::coerce;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Whether a property can or must carry a value, and how it may be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Parametrization {
    /// `--key` only; `--key=value` is an error, `--key value` drops the value
    #[serde(alias = "PARAMETER_PROHIBITED")]
    Prohibited,
    /// `--key`, `--key=value` and `--key value` are all accepted
    #[serde(alias = "PARAMETER_OPTIONAL")]
    Optional,
    /// Only `--key=value` carries a value; `--key value` records a bare key
    #[serde(alias = "ONLY_EQUALS_SIGN_PARAMETER")]
    OnlyExplicitEquals,
    /// A value must be supplied whenever the key is present
    #[serde(alias = "PARAMETER_REQUIRED")]
    Required,
}

/// Declared type of a property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamType {
    None,
    String,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParamType::None => "parameterless",
            ParamType::String => "a string",
            ParamType::Integer => "an integer",
            ParamType::Float => "a number",
            ParamType::Boolean => "a boolean",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDefinition {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
    parametrization: Parametrization,
    required: bool,
    param_type: ParamType,
    #[serde(rename = "cmd_aliases", skip_serializing_if = "BTreeSet::is_empty")]
    long_aliases: BTreeSet<String>,
    #[serde(rename = "char_cmd_alias", skip_serializing_if = "Option::is_none")]
    char_alias: Option<char>,
}

impl PropertyDefinition {
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder::new(name.into())
    }

    /// A flag: no value allowed, never required.
    pub fn parameterless(name: impl Into<String>, description: Option<&str>) -> Result<Self> {
        Self::builder(name)
            .description(description)
            .parametrization(Parametrization::Prohibited)
            .build()
    }

    /// A required string property with no default.
    pub fn key_value_required(name: impl Into<String>, description: Option<&str>) -> Result<Self> {
        Self::builder(name)
            .description(description)
            .parametrization(Parametrization::Required)
            .param_type(ParamType::String)
            .required(true)
            .build()
    }

    /// An optional string property that needs a value whenever it is given.
    pub fn key_value_optional(name: impl Into<String>, description: Option<&str>) -> Result<Self> {
        Self::builder(name)
            .description(description)
            .parametrization(Parametrization::Required)
            .param_type(ParamType::String)
            .build()
    }

    /// A non-required string property that needs a value whenever it is given,
    /// built without validation for names known to be well formed.
    pub(crate) fn valued_string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            default_value: None,
            parametrization: Parametrization::Required,
            required: false,
            param_type: ParamType::String,
            long_aliases: BTreeSet::new(),
            char_alias: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn parametrization(&self) -> Parametrization {
        self.parametrization
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    pub fn long_aliases(&self) -> impl Iterator<Item = &str> {
        self.long_aliases.iter().map(String::as_str)
    }

    pub fn char_alias(&self) -> Option<char> {
        self.char_alias
    }

    pub fn is_parameterless(&self) -> bool {
        self.parametrization == Parametrization::Prohibited
    }
}

/// Collects definition fields; `build` checks them all at once.
#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
    name: String,
    description: Option<String>,
    default_value: Option<String>,
    parametrization: Parametrization,
    required: bool,
    param_type: Option<ParamType>,
    long_aliases: BTreeSet<String>,
    char_alias: Option<char>,
}

impl DefinitionBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            default_value: None,
            parametrization: Parametrization::Optional,
            required: false,
            param_type: None,
            long_aliases: BTreeSet::new(),
            char_alias: None,
        }
    }

    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn parametrization(mut self, parametrization: Parametrization) -> Self {
        self.parametrization = parametrization;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn param_type(mut self, param_type: ParamType) -> Self {
        self.param_type = Some(param_type);
        self
    }

    pub fn long_alias(mut self, alias: impl Into<String>) -> Self {
        self.long_aliases.insert(alias.into());
        self
    }

    pub fn long_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.long_aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn char_alias(mut self, alias: char) -> Self {
        self.char_alias = Some(alias);
        self
    }

    pub(crate) fn maybe_default_value(mut self, value: Option<String>) -> Self {
        self.default_value = value;
        self
    }

    pub(crate) fn maybe_param_type(mut self, param_type: Option<ParamType>) -> Self {
        self.param_type = param_type;
        self
    }

    pub(crate) fn maybe_char_alias(mut self, alias: Option<char>) -> Self {
        self.char_alias = alias;
        self
    }

    pub fn build(self) -> Result<PropertyDefinition> {
        let invalid = |reason: &str| PropertyError::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }

        let prohibited = self.parametrization == Parametrization::Prohibited;

        // Parameterless properties default to NONE, everything else to STRING.
        let param_type = match (self.param_type, prohibited) {
            (None, true) => ParamType::None,
            (None, false) => ParamType::String,
            (Some(ParamType::None), false) => {
                return Err(invalid("NONE type is only allowed for parameterless properties"))
            }
            (Some(ty), true) if ty != ParamType::None => {
                return Err(invalid("parameterless property can't declare a value type"))
            }
            (Some(ty), _) => ty,
        };

        if self.default_value.is_some() && prohibited {
            return Err(invalid("Can't set default value for parameterless property"));
        }
        if self.required && self.default_value.is_some() {
            return Err(invalid("Can't be required and have a default value at the same time"));
        }
        if let Some(default) = &self.default_value {
            coerce::check(&self.name, default, param_type)?;
        }
        if self.long_aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(invalid("command-line aliases must not be empty"));
        }
        if matches!(self.char_alias, Some(c) if c.is_whitespace() || c == '-' || c == '=') {
            return Err(invalid("char alias must be a visible character other than '-' or '='"));
        }

        Ok(PropertyDefinition {
            name: self.name,
            description: self.description,
            default_value: self.default_value,
            parametrization: self.parametrization,
            required: self.required,
            param_type,
            long_aliases: self.long_aliases,
            char_alias: self.char_alias,
        })
    }
}
