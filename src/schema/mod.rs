//! Property schema: definitions, the registry that resolves names and aliases,
//! and declarative YAML loading

pub mod definition;
pub mod loader;
pub mod registry;

pub use definition::{DefinitionBuilder, ParamType, Parametrization, PropertyDefinition};
pub use loader::{adjust_names, load_yaml_schema, parse_yaml_schema, DefinitionDraft};
pub use registry::PropertyRegistry;
