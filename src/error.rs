//! Error taxonomy for schema loading, command-line tokenizing and resolution
//!
//! Every failure aborts the whole resolution call; lenient options only turn
//! some of these conditions into skips before an error is ever built.

use crate::schema::ParamType;
use crate::sources::ValueSource;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PropertyError>;

/// How a value disagreed with a property's parametrization degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A value was attached to a parameterless property
    UnexpectedValue(String),
    /// A property that needs a value was given none
    MissingValue,
    /// A value followed the key as a separate token while only `key=value` is allowed
    WithoutEqualSign(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnexpectedValue(value) => {
                write!(f, "is parameterless, but its value is \"{}\"", value)
            }
            Violation::MissingValue => write!(f, "should have a value, but it doesn't"),
            Violation::WithoutEqualSign(value) => write!(
                f,
                "is parametrized without equal sign (value \"{}\"), but it's prohibited",
                value
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("Dangling token \"{token}\" found in {args}")]
    DanglingToken { token: String, args: String },

    #[error("Unknown property \"{name}\" was found in {origin}")]
    UnknownProperty { name: String, origin: ValueSource },

    #[error("Property \"{name}\" {violation}")]
    ParametrizationViolation { name: String, violation: Violation },

    #[error("Property \"{name}\" should have been {expected}, but input string: \"{value}\"")]
    TypeCoercion { name: String, expected: ParamType, value: String },

    #[error("Property \"{name}\" is required, but it's not set")]
    MissingRequiredProperty { name: String },

    #[error(
        "Property name must be almost the same as key, they can use different case or hyphens or dots, \
         but alphanumerical characters must be equal ({key} vs {name})"
    )]
    NameMismatch { key: String, name: String },

    #[error("Property \"{name}\" already has a name, it can't be renamed to \"{attempted}\"")]
    ImmutableNameReassignment { name: String, attempted: String },

    #[error("Invalid definition of property \"{name}\": {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Property \"{name}\" is declared more than once (schema key \"{key}\")")]
    DuplicateDefinition { name: String, key: String },

    #[error("{origin} not found")]
    SourceNotFound { origin: ValueSource },

    #[error("Malformed \\uxxxx escape in property line \"{line}\"")]
    MalformedEscape { line: String },

    #[error("Failed reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid property schema: {0}")]
    SchemaParse(#[from] serde_yaml::Error),
}

impl PropertyError {
    pub(crate) fn violation(name: impl Into<String>, violation: Violation) -> Self {
        PropertyError::ParametrizationViolation { name: name.into(), violation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parametrization_messages_name_the_property() {
        let err = PropertyError::violation("Delayed", Violation::UnexpectedValue("certainly".into()));
        assert_eq!(err.to_string(), "Property \"Delayed\" is parameterless, but its value is \"certainly\"");

        let err = PropertyError::violation("DB_path", Violation::MissingValue);
        assert_eq!(err.to_string(), "Property \"DB_path\" should have a value, but it doesn't");
    }

    #[test]
    fn unknown_property_message_includes_origin() {
        let err = PropertyError::UnknownProperty {
            name: "DB_UNER".into(),
            origin: ValueSource::CommandLine,
        };
        assert_eq!(
            err.to_string(),
            "Unknown property \"DB_UNER\" was found in command line arguments"
        );
    }

    #[test]
    fn name_mismatch_message_shows_both_names() {
        let err = PropertyError::NameMismatch { key: "SERVER_PORT".into(), name: "ClientPort".into() };
        assert!(err.to_string().ends_with("(SERVER_PORT vs ClientPort)"));
    }
}
