//! End-to-end tests: YAML schema on disk, resources from a directory

use proploader::{
    DirResources, LoaderOptions, MapEnvironment, PropertyError, PropertyLoader, PropertyRegistry, Sources,
    ValueSource,
};
use std::fs;
use tempfile::TempDir;

const SCHEMA: &str = r#"
properties:
  DB_PATH:
    description: Path to database
    parametrization: REQUIRED
    required: true
  TTL:
    description: Server timeout (in millis)
    param_type: INTEGER
    default_value: "3000"
    char_cmd_alias: t
  verbose:
    parametrization: PROHIBITED
    cmd_aliases: [chatty]
    char_cmd_alias: v
  ratio:
    param_type: FLOAT
    parametrization: ONLY_EXPLICIT_EQUALS
"#;

fn setup() -> (TempDir, PropertyRegistry) {
    let tmp = TempDir::new().expect("tmp");
    let schema = tmp.path().join("schema.yaml");
    fs::write(&schema, SCHEMA).expect("write schema");
    fs::write(tmp.path().join("properties.properties"), "DB_PATH=/srv/db\nverbose\n").expect("write resource");
    let registry = PropertyRegistry::from_yaml_file(&schema, false).expect("schema");
    (tmp, registry)
}

#[test]
fn test_schema_file_drives_resolution() {
    let (tmp, registry) = setup();
    assert_eq!(registry.len(), 4);

    let props = PropertyLoader::new(registry)
        .environment(MapEnvironment::new().with_var("APP_TTL", "250"))
        .resources(DirResources::new(tmp.path()))
        .resolve(&Sources::new().args(["--ratio=0.75"]).env_prefix("APP_"))
        .expect("resolve");

    assert_eq!(props.get("db_path"), Some("/srv/db"));
    assert_eq!(props.get_int("ttl").expect("int"), Some(250));
    assert_eq!(props.get_float("RATIO").expect("float"), Some(0.75));
    assert!(props.get_bool("verbose").expect("flag"));
    assert_eq!(props.source_of("verbose"), Some(&ValueSource::Resource("properties.properties".into())));
}

#[test]
fn test_schema_aliases_on_command_line() {
    let (tmp, registry) = setup();
    let loader = PropertyLoader::new(registry)
        .environment(MapEnvironment::new())
        .resources(DirResources::new(tmp.path()));

    let props = loader.resolve(&Sources::new().args(["-t", "10", "--chatty"])).expect("resolve");
    assert_eq!(props.get("TTL"), Some("10"));
    assert_eq!(props.source_of("TTL"), Some(&ValueSource::CommandLine));
    assert!(props.contains("verbose"));

    let err = loader.resolve(&Sources::new().args(["-v=loud"])).expect_err("flag with value");
    assert!(matches!(err, PropertyError::ParametrizationViolation { ref name, .. } if name == "v"));
}

#[test]
fn test_missing_required_from_schema() {
    let (tmp, registry) = setup();
    fs::remove_file(tmp.path().join("properties.properties")).expect("remove resource");

    let err = PropertyLoader::new(registry)
        .environment(MapEnvironment::new())
        .resources(DirResources::new(tmp.path()))
        .resolve(&Sources::new())
        .expect_err("DB_PATH is required");
    assert_eq!(err.to_string(), "Property \"DB_PATH\" is required, but it's not set");
}

#[test]
fn test_options_from_yaml() {
    let (tmp, registry) = setup();
    let options: LoaderOptions =
        serde_yaml::from_str("fail_on_unknown_cmd_property: false\nwindows_key_compatibility: true\n")
            .expect("options");

    let props = PropertyLoader::with_options(registry, options)
        .environment(MapEnvironment::new())
        .resources(DirResources::new(tmp.path()))
        .resolve(&Sources::new().args(["/TTL=12", "--unheard-of"]))
        .expect("resolve");
    assert_eq!(props.get("TTL"), Some("12"));
    assert!(!props.contains("unheard-of"));
}

#[test]
fn test_schema_round_trip_through_yaml() {
    let (_tmp, registry) = setup();
    let yaml = registry.to_yaml_string().expect("serialize");
    let reloaded = PropertyRegistry::from_yaml_str(&yaml, false).expect("reload");
    assert_eq!(reloaded.len(), registry.len());
    for def in registry.iter() {
        similar_asserts::assert_eq!(reloaded.get(def.name()), Some(def));
    }
}
