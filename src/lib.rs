//! proploader: resolve application properties from ranked sources
//!
//! Properties are declared once in a [`PropertyRegistry`] (in code or from a
//! YAML schema) and then resolved by a [`PropertyLoader`] from, in order of
//! precedence: command-line arguments, an external property file, environment
//! variables, an embedded resource, and schema defaults.
//!
//! ```no_run
//! use proploader::{PropertyDefinition, PropertyLoader, PropertyRegistry, Sources};
//!
//! # fn main() -> proploader::Result<()> {
//! let mut registry = PropertyRegistry::case_insensitive();
//! registry.register(PropertyDefinition::key_value_required("DB_PATH", Some("Path to database"))?);
//! registry.register(PropertyDefinition::parameterless("verbose", None)?);
//!
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! let props = PropertyLoader::new(registry).resolve(&Sources::new().args(args).env_prefix("APP_"))?;
//! println!("db at {:?}, verbose: {}", props.get("db_path"), props.get_bool("verbose")?);
//! # Ok(())
//! # }
//! ```

pub mod cmdline;
pub mod error;
pub mod resolve;
pub mod schema;
pub mod sources;

pub use cmdline::{tokenize, TokenKey, TokenProperty, TokenStream, TokenizerOptions};
pub use error::{PropertyError, Result, Violation};
pub use resolve::{
    LoaderOptions, PropertyLoader, ResolvedProperties, ResolvedProperty, Sources, DEFAULT_RESOURCE_NAME,
    PROPERTY_FILE_PROPERTY,
};
pub use schema::{DefinitionBuilder, ParamType, Parametrization, PropertyDefinition, PropertyRegistry};
pub use sources::{
    DirResources, EnvironmentProvider, MapEnvironment, MapResources, ProcessEnvironment, PropertyMap,
    ResourceProvider, ValueSource,
};
