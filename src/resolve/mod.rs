//! Ranked property resolution
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Command-line arguments
//! 2. External property file (its path may itself come from the command line
//!    or the environment, see [`PROPERTY_FILE_PROPERTY`])
//! 3. Environment variables, optionally filtered by a name prefix
//! 4. Embedded resource
//! 5. Schema defaults
//!
//! A property set by a higher source is never replaced by a lower one. Any
//! error aborts the run and no partial map is returned.

use crate::cmdline::{tokenize, TokenProperty};
use crate::error::{PropertyError, Result, Violation};
use crate::schema::{Parametrization, PropertyDefinition, PropertyRegistry};
use crate::sources::{
    read_properties_file, EnvironmentProvider, MapResources, ProcessEnvironment, ResourceProvider,
    ValueSource,
};
use std::path::PathBuf;

pub mod coerce;
pub mod options;
pub mod resolved;

pub use options::LoaderOptions;
pub use resolved::{ResolvedProperties, ResolvedProperty};

/// Property that redirects the external property file.
pub const PROPERTY_FILE_PROPERTY: &str = "property-file";

/// Resource tried when no resource name is given.
pub const DEFAULT_RESOURCE_NAME: &str = "properties.properties";

/// Inputs of one resolution run.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub args: Vec<String>,
    pub property_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
    pub resource: Option<String>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn property_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.property_file = Some(path.into());
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn resource(mut self, name: impl Into<String>) -> Self {
        self.resource = Some(name.into());
        self
    }
}

pub struct PropertyLoader {
    registry: PropertyRegistry,
    options: LoaderOptions,
    environment: Box<dyn EnvironmentProvider>,
    resources: Box<dyn ResourceProvider>,
    /// The redirect property was added by us and is dropped from results
    implicit_redirect: bool,
}

impl PropertyLoader {
    pub fn new(registry: PropertyRegistry) -> Self {
        Self::with_options(registry, LoaderOptions::default())
    }

    pub fn with_options(mut registry: PropertyRegistry, options: LoaderOptions) -> Self {
        let implicit_redirect =
            options.allow_property_file_redirect && !registry.contains(PROPERTY_FILE_PROPERTY);
        if implicit_redirect {
            registry.register(redirect_definition());
        }

        Self {
            registry,
            options,
            environment: Box::new(ProcessEnvironment),
            resources: Box::new(MapResources::new()),
            implicit_redirect,
        }
    }

    pub fn environment(mut self, environment: impl EnvironmentProvider + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    pub fn resources(mut self, resources: impl ResourceProvider + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Resolve all sources in precedence order, then apply defaults and
    /// check required properties.
    pub fn resolve(&self, sources: &Sources) -> Result<ResolvedProperties> {
        let mut props = ResolvedProperties::new(self.registry.is_case_sensitive());

        self.apply_command_line(&sources.args, &mut props)?;

        if let Some(path) = self.property_file_path(sources, &mut props) {
            self.apply_property_file(path, &mut props)?;
        }

        let prefix = sources.env_prefix.as_deref().filter(|p| !p.is_empty());
        let origin = ValueSource::Environment(prefix.map(str::to_string));
        let strict = self.options.fail_on_unknown_env_property && prefix.is_some();
        let count = self.apply_map(self.environment.vars(), prefix, strict, &origin, &mut props)?;
        tracing::debug!("Resolved {} properties from {}", count, origin);

        self.apply_resource(sources.resource.as_deref(), &mut props)?;
        self.apply_defaults(&mut props)?;
        self.drop_implicit_redirect(&mut props);
        Ok(props)
    }

    /// Resolve only the command line, without defaults or requiredness checks.
    pub fn resolve_command_line(&self, args: &[String]) -> Result<ResolvedProperties> {
        let mut props = ResolvedProperties::new(self.registry.is_case_sensitive());
        self.apply_command_line(args, &mut props)?;
        self.drop_implicit_redirect(&mut props);
        Ok(props)
    }

    /// Remove the implicitly registered redirect from a finished map.
    fn drop_implicit_redirect(&self, props: &mut ResolvedProperties) {
        if self.implicit_redirect {
            props.remove(PROPERTY_FILE_PROPERTY);
        }
    }

    fn apply_command_line(&self, args: &[String], props: &mut ResolvedProperties) -> Result<()> {
        let tokens = tokenize(args, self.options.tokenizer())?;

        for token in &tokens {
            let Some(def) = self.registry.resolve(token) else {
                if self.options.fail_on_unknown_cmd_property {
                    return Err(PropertyError::UnknownProperty {
                        name: token.key_text(),
                        origin: ValueSource::CommandLine,
                    });
                }
                tracing::debug!("Skipping unknown command-line property \"{}\"", token.key_text());
                continue;
            };

            let value = self.command_line_value(def, token)?;
            if !props.insert(def.name(), value, ValueSource::CommandLine) {
                tracing::debug!(
                    "Property \"{}\" is given more than once on the command line, keeping the first",
                    def.name()
                );
            }
        }
        Ok(())
    }

    fn command_line_value(&self, def: &PropertyDefinition, token: &TokenProperty) -> Result<Option<String>> {
        let explicit = token.is_explicitly_parametrized();

        match (def.parametrization(), token.value()) {
            (Parametrization::Prohibited, Some(value)) if explicit => Err(PropertyError::violation(
                token.key_text(),
                Violation::UnexpectedValue(value.to_string()),
            )),
            // The next word was never meant for this key.
            (Parametrization::Prohibited | Parametrization::OnlyExplicitEquals, Some(value)) if !explicit => {
                tracing::debug!("Dropping value \"{}\" that follows key \"{}\"", value, token.key_text());
                Ok(None)
            }
            (Parametrization::Required, None) => {
                Err(PropertyError::violation(token.key_text(), Violation::MissingValue))
            }
            (_, None) => Ok(None),
            (_, Some(value)) => {
                if !explicit && !self.options.allow_value_without_equal_sign {
                    return Err(PropertyError::violation(
                        token.key_text(),
                        Violation::WithoutEqualSign(value.to_string()),
                    ));
                }
                coerce::check(def.name(), value, def.param_type())?;
                Ok(Some(value.to_string()))
            }
        }
    }

    /// Where the external property file is, after redirects.
    fn property_file_path(&self, sources: &Sources, props: &mut ResolvedProperties) -> Option<PathBuf> {
        if !self.options.allow_property_file_redirect {
            return sources.property_file.clone();
        }

        if !props.contains(PROPERTY_FILE_PROPERTY) {
            if let Some(prefix) = &sources.env_prefix {
                let wanted = format!("{}{}", prefix, PROPERTY_FILE_PROPERTY);
                let found = self.environment.vars().into_iter().find(|(k, _)| k.eq_ignore_ascii_case(&wanted));
                if let Some((_, path)) = found {
                    props.insert(
                        PROPERTY_FILE_PROPERTY,
                        Some(path),
                        ValueSource::Environment(Some(prefix.clone())),
                    );
                }
            }
        }

        match props.get(PROPERTY_FILE_PROPERTY) {
            Some(path) => {
                tracing::debug!("{} path was overridden to {}", PROPERTY_FILE_PROPERTY, path);
                Some(PathBuf::from(path))
            }
            None => sources.property_file.clone(),
        }
    }

    fn apply_property_file(&self, path: PathBuf, props: &mut ResolvedProperties) -> Result<()> {
        let map = read_properties_file(&path)?;
        let origin = ValueSource::PropertyFile(path);

        let Some(map) = map else {
            if self.options.fail_on_missing_property_file {
                return Err(PropertyError::SourceNotFound { origin });
            }
            tracing::debug!("{} not found, skipping it", origin);
            return Ok(());
        };

        tracing::debug!("Loaded {} properties from {}", map.len(), origin);
        let strict = self.options.fail_on_unknown_file_property;
        self.apply_map(map, None, strict, &origin, props)?;
        Ok(())
    }

    fn apply_resource(&self, name: Option<&str>, props: &mut ResolvedProperties) -> Result<()> {
        let explicit = name.is_some();
        let name = name.unwrap_or(DEFAULT_RESOURCE_NAME);
        let origin = ValueSource::Resource(name.to_string());

        match self.resources.load(name)? {
            Some(map) => {
                let strict = self.options.fail_on_unknown_resource_property;
                let count = self.apply_map(map, None, strict, &origin, props)?;
                tracing::debug!("Resolved {} properties from {}", count, origin);
                Ok(())
            }
            None if explicit && self.options.fail_on_missing_resource => {
                Err(PropertyError::SourceNotFound { origin })
            }
            None => {
                tracing::debug!("{} not found, skipping it", origin);
                Ok(())
            }
        }
    }

    /// Resolve flat key/value entries by definition name. Returns how many were recorded.
    fn apply_map<I>(
        &self,
        entries: I,
        prefix: Option<&str>,
        strict: bool,
        origin: &ValueSource,
        props: &mut ResolvedProperties,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut recorded = 0;
        for (full_name, raw) in entries {
            let name = match prefix {
                Some(prefix) => match full_name.strip_prefix(prefix) {
                    Some(rest) => rest,
                    None => continue,
                },
                None => full_name.as_str(),
            };

            let Some(def) = self.registry.get(name) else {
                if strict {
                    return Err(PropertyError::UnknownProperty {
                        name: name.to_string(),
                        origin: origin.clone(),
                    });
                }
                continue;
            };

            if props.contains(def.name()) {
                continue;
            }

            let value = if def.is_parameterless() {
                if !coerce::is_presence_marker(&raw) {
                    return Err(PropertyError::violation(def.name(), Violation::UnexpectedValue(raw)));
                }
                None
            } else {
                coerce::check(def.name(), &raw, def.param_type())?;
                Some(raw)
            };

            props.insert(def.name(), value, origin.clone());
            recorded += 1;
        }
        Ok(recorded)
    }

    fn apply_defaults(&self, props: &mut ResolvedProperties) -> Result<()> {
        for def in self.registry.iter() {
            if props.contains(def.name()) {
                continue;
            }
            if def.is_required() {
                return Err(PropertyError::MissingRequiredProperty { name: def.name().to_string() });
            }
            if let Some(default) = def.default_value() {
                props.insert(def.name(), Some(default.to_string()), ValueSource::Default);
            }
        }
        Ok(())
    }
}

fn redirect_definition() -> PropertyDefinition {
    PropertyDefinition::valued_string(PROPERTY_FILE_PROPERTY, "Path to external properties file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamType;
    use crate::sources::MapEnvironment;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn registry() -> PropertyRegistry {
        let mut registry = PropertyRegistry::case_insensitive();
        registry.register(PropertyDefinition::key_value_optional("DB_Password", None).expect("def"));
        registry.register(PropertyDefinition::parameterless("Delayed", None).expect("def"));
        registry.register(
            PropertyDefinition::builder("DelayTime")
                .default_value("60s")
                .parametrization(Parametrization::Optional)
                .build()
                .expect("def"),
        );
        registry.register(
            PropertyDefinition::builder("TTL")
                .default_value("3000")
                .parametrization(Parametrization::Required)
                .param_type(ParamType::Integer)
                .build()
                .expect("def"),
        );
        registry.register(
            PropertyDefinition::builder("token")
                .parametrization(Parametrization::OnlyExplicitEquals)
                .build()
                .expect("def"),
        );
        registry
    }

    fn loader(options: LoaderOptions) -> PropertyLoader {
        PropertyLoader::with_options(registry(), options).environment(MapEnvironment::new())
    }

    #[test]
    fn prohibited_key_drops_adjacent_value() {
        let props = loader(LoaderOptions::default())
            .resolve_command_line(&args(&["--Delayed", "certainly"]))
            .expect("resolve");
        assert!(props.contains("delayed"));
        assert_eq!(props.get("delayed"), None);
    }

    #[test]
    fn prohibited_key_rejects_explicit_value() {
        let err = loader(LoaderOptions::default())
            .resolve_command_line(&args(&["--Delayed=certainly"]))
            .expect_err("must fail");
        assert_eq!(err.to_string(), "Property \"Delayed\" is parameterless, but its value is \"certainly\"");
    }

    #[test]
    fn only_explicit_equals_ignores_adjacent_value() {
        let options = LoaderOptions { fail_on_dangling_token: false, ..LoaderOptions::default() };
        let props = loader(options.clone()).resolve_command_line(&args(&["--token", "abc"])).expect("resolve");
        assert!(props.contains("token"));
        assert_eq!(props.get("token"), None);

        let props = loader(options).resolve_command_line(&args(&["--token=abc"])).expect("resolve");
        assert_eq!(props.get("token"), Some("abc"));
    }

    #[test]
    fn required_parametrization_needs_value() {
        let err = loader(LoaderOptions::default())
            .resolve_command_line(&args(&["--Delayed", "--ttl", "--DB_PASSWORD", "x"]))
            .expect_err("must fail");
        assert_eq!(err.to_string(), "Property \"ttl\" should have a value, but it doesn't");
    }

    #[test]
    fn value_without_equal_sign_can_be_forbidden() {
        let options = LoaderOptions { allow_value_without_equal_sign: false, ..LoaderOptions::default() };

        let err = loader(options.clone())
            .resolve_command_line(&args(&["--DelayTime", "5min", "--Delayed", "--DB_PASSWORD=pw"]))
            .expect_err("must fail");
        assert!(err.to_string().contains("parametrized without equal sign"));
        assert!(err.to_string().contains("DelayTime"));

        let props = loader(options)
            .resolve_command_line(&args(&["--DelayTime", "--Delayed", "--DB_PASSWORD=password"]))
            .expect("resolve");
        assert_eq!(props.len(), 3);
        assert_eq!(props.get("DelayTime"), None);
        assert_eq!(props.get("DB_PASSWORD"), Some("password"));
    }

    #[test]
    fn repeated_key_keeps_first_value() {
        let props = loader(LoaderOptions::default())
            .resolve_command_line(&args(&["--TTL", "5", "--ttl=7"]))
            .expect("resolve");
        assert_eq!(props.get_int("TTL").expect("int"), Some(5));
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let props = loader(LoaderOptions::default()).resolve(&Sources::new()).expect("resolve");
        assert_eq!(props.get("DelayTime"), Some("60s"));
        assert_eq!(props.get_int("TTL").expect("int"), Some(3000));
        assert_eq!(props.source_of("TTL"), Some(&ValueSource::Default));
        assert!(!props.contains("Delayed"));
        assert!(!props.contains(PROPERTY_FILE_PROPERTY));
    }

    #[test]
    fn redirect_property_is_registered_only_when_enabled() {
        assert!(loader(LoaderOptions::default()).registry().contains(PROPERTY_FILE_PROPERTY));
        let options = LoaderOptions { allow_property_file_redirect: false, ..LoaderOptions::default() };
        assert!(!loader(options).registry().contains(PROPERTY_FILE_PROPERTY));
    }

    #[test]
    fn redirect_is_not_reported_from_command_line_only() {
        let props = loader(LoaderOptions::default())
            .resolve_command_line(&args(&["--property-file", "/x.properties", "--TTL=4"]))
            .expect("resolve");
        assert!(!props.contains(PROPERTY_FILE_PROPERTY));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn declared_redirect_stays_in_the_map() {
        let mut registry = registry();
        registry.register(redirect_definition());
        let props = PropertyLoader::new(registry)
            .environment(MapEnvironment::new())
            .resolve_command_line(&args(&["--property-file", "/x.properties"]))
            .expect("resolve");
        assert_eq!(props.get(PROPERTY_FILE_PROPERTY), Some("/x.properties"));
    }

    #[test]
    fn redirect_definition_matches_builder_output() {
        let built = PropertyDefinition::builder(PROPERTY_FILE_PROPERTY)
            .description(Some("Path to external properties file"))
            .parametrization(Parametrization::Required)
            .param_type(ParamType::String)
            .build()
            .expect("def");
        assert_eq!(redirect_definition(), built);
    }

    #[test]
    fn missing_named_resource_is_an_error() {
        let err = loader(LoaderOptions::default())
            .resolve(&Sources::new().resource("absent.properties"))
            .expect_err("must fail");
        assert!(matches!(err, PropertyError::SourceNotFound { origin: ValueSource::Resource(_) }));

        let options = LoaderOptions { fail_on_missing_resource: false, ..LoaderOptions::default() };
        assert!(loader(options).resolve(&Sources::new().resource("absent.properties")).is_ok());
    }

    #[test]
    fn parameterless_property_from_map_accepts_presence_markers() {
        let env = MapEnvironment::new().with_var("app.Delayed", "yes");
        let props = PropertyLoader::new(registry())
            .environment(env)
            .resolve(&Sources::new().env_prefix("app."))
            .expect("resolve");
        assert!(props.contains("Delayed"));
        assert_eq!(props.get("Delayed"), None);

        let env = MapEnvironment::new().with_var("app.Delayed", "sometimes");
        let err = PropertyLoader::new(registry())
            .environment(env)
            .resolve(&Sources::new().env_prefix("app."))
            .expect_err("must fail");
        assert!(matches!(err, PropertyError::ParametrizationViolation { .. }));
    }
}
