//! Integration tests for loading, merging and dumping configuration.
//!
//! Checked-in fixtures live under `tests/fixtures/`; tests that need
//! throwaway files build them in a `TempDir`.

use std::fs;
use std::path::{Path, PathBuf};

use confstack::format::{JsonParser, Parser, TomlDumper, TomlParser};
use confstack::{Config, DumperEntry, Error, FormatKind, ParserEntry, Source};
use serde_json::{json, Value};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Helper to get path to test fixtures.
fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

/// Helper to create a temporary config file.
fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

fn tree(config: &Config) -> Value {
    Value::Object(config.all().clone())
}

// ============================================================================
// Layered Loading
// ============================================================================

#[test]
fn test_layered_directory_merges_in_name_order() {
    let config = Config::from_sources(fixture_path("layered")).unwrap();

    assert_eq!(
        tree(&config),
        json!({
            "app": {"name": "inventory", "debug": true, "workers": 8},
            "db": {"host": "db.internal", "port": 5432, "replicas": ["primary-replica"]},
            "cache": {"driver": "redis", "ttl": 300}
        })
    );
}

#[test]
fn test_nested_source_lists_across_formats() {
    let config = Config::from_sources(vec![
        Source::from(fixture_path("layered/10-base.json")),
        Source::from(vec![
            fixture_path("formats/settings.php"),
            fixture_path("formats/services.xml"),
        ]),
    ])
    .unwrap();

    assert_eq!(config.get("app.name"), Some(&json!("inventory")));
    assert_eq!(config.get("mail.from.address"), Some(&json!("noreply@example.com")));
    assert_eq!(config.get("mail.encryption"), Some(&Value::Null));
    assert_eq!(config.get("services.service.1"), Some(&json!("search")));
    assert_eq!(config.get("queue.@attributes.driver"), Some(&json!("sqs")));
}

#[test]
fn test_order_dependent_override() {
    let temp_dir = TempDir::new().unwrap();
    let a = create_temp_config(temp_dir.path(), "a.json", r#"{"a": 1, "b": 2}"#);
    let b = create_temp_config(temp_dir.path(), "b.json", r#"{"b": 3}"#);

    let forward = Config::from_sources([a.clone(), b.clone()]).unwrap();
    let backward = Config::from_sources([b, a]).unwrap();

    assert_eq!(tree(&forward), json!({"a": 1, "b": 3}));
    assert_eq!(tree(&backward), json!({"a": 1, "b": 2}));
}

#[test]
fn test_deep_merge_union() {
    let temp_dir = TempDir::new().unwrap();
    let a = create_temp_config(temp_dir.path(), "a.json", r#"{"db": {"host": "x"}}"#);
    let b = create_temp_config(temp_dir.path(), "b.yml", "db:\n  port: 5432\n");

    let config = Config::from_sources([a, b]).unwrap();
    assert_eq!(tree(&config), json!({"db": {"host": "x", "port": 5432}}));
}

#[test]
fn test_sequences_are_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let a = create_temp_config(temp_dir.path(), "a.json", r#"{"list": [1, 2, 3]}"#);
    let b = create_temp_config(temp_dir.path(), "b.json", r#"{"list": [9]}"#);

    let config = Config::from_sources([a, b]).unwrap();
    assert_eq!(tree(&config), json!({"list": [9]}));
}

#[test]
fn test_readding_same_file_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_temp_config(
        temp_dir.path(),
        "flat.ini",
        "name = demo\nport = 8080\nenabled = yes\n",
    );

    let mut config = Config::from_sources(&file).unwrap();
    let once = tree(&config);
    config.add(&file).unwrap();
    assert_eq!(tree(&config), once);
}

#[test]
fn test_directory_with_mixed_formats() {
    let temp_dir = TempDir::new().unwrap();
    create_temp_config(temp_dir.path(), "a.json", r#"{"from_json": true}"#);
    create_temp_config(temp_dir.path(), "b.yml", "from_yaml: true\n");

    let config = Config::from_sources(temp_dir.path()).unwrap();
    assert!(config.has("from_json"));
    assert!(config.has("from_yaml"));
}

#[test]
fn test_empty_directory_adds_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::from_sources(temp_dir.path()).unwrap();
    assert!(config.all().is_empty());
}

#[test]
fn test_empty_yaml_file_adds_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_temp_config(temp_dir.path(), "empty.yml", "");

    let config = Config::from_sources(file).unwrap();
    assert!(config.all().is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file_leaves_tree_unchanged() {
    let mut config = Config::from_sources(fixture_path("layered/10-base.json")).unwrap();
    let before = tree(&config);

    let err = config.add("/no/such/file.json").unwrap_err();
    match err {
        Error::FileNotFound { path } => assert_eq!(path, PathBuf::from("/no/such/file.json")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(tree(&config), before);
}

#[test]
fn test_missing_file_in_list_prevents_any_merge() {
    let temp_dir = TempDir::new().unwrap();
    let good = create_temp_config(temp_dir.path(), "good.json", r#"{"a": 1}"#);

    let mut config = Config::new();
    let err = config
        .add(vec![good, temp_dir.path().join("absent.json")])
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(config.all().is_empty());
}

#[test]
fn test_parse_failure_keeps_earlier_merges() {
    let temp_dir = TempDir::new().unwrap();
    let good = create_temp_config(temp_dir.path(), "good.json", r#"{"a": 1}"#);
    let bad = create_temp_config(temp_dir.path(), "bad.json", r#"{"b": "#);
    let never = create_temp_config(temp_dir.path(), "never.json", r#"{"c": 3}"#);

    let mut config = Config::new();
    let err = config.add([good, bad, never]).unwrap_err();

    assert!(matches!(err, Error::Parse { format: "json", .. }));
    assert_eq!(tree(&config), json!({"a": 1}));
}

#[test]
fn test_deeply_nested_php_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let depth = 200_000;
    let file = create_temp_config(
        temp_dir.path(),
        "deep.php",
        &format!("<?php return {}{};", "[".repeat(depth), "]".repeat(depth)),
    );

    let mut config = Config::new();
    let err = config.add(file).unwrap_err();
    assert!(matches!(err, Error::Parse { format: "php", .. }));
    assert!(config.all().is_empty());
}

#[test]
fn test_unsupported_extension_in_directory() {
    let temp_dir = TempDir::new().unwrap();
    create_temp_config(temp_dir.path(), "a.json", r#"{"a": 1}"#);
    create_temp_config(temp_dir.path(), "notes.txt", "not config");

    let mut config = Config::new();
    let err = config.add(temp_dir.path()).unwrap_err();
    assert!(err.is_unsupported_extension(FormatKind::Parse));
    assert!(format!("{err}").contains("'txt'"));
    assert_eq!(tree(&config), json!({"a": 1}));
}

#[test]
fn test_dump_toml_without_dumper() {
    let config = Config::from_sources(fixture_path("layered")).unwrap();
    match config.dump("toml") {
        Err(Error::UnsupportedExtension { extension, kind }) => {
            assert_eq!(extension, "toml");
            assert_eq!(kind, FormatKind::Dump);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(out) => panic!("unexpected output: {out}"),
    }
}

// ============================================================================
// Registry Extension
// ============================================================================

#[derive(Default)]
struct Tagging;

impl Parser for Tagging {
    fn parse(&self, path: &Path) -> confstack::Result<Value> {
        let mut value = JsonParser.parse(path)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("parsed_by".to_string(), json!("tagging"));
        }
        Ok(value)
    }
}

#[test]
fn test_add_parsers_before_first_parse_wins() {
    let mut config = Config::new();
    config.add_parsers([ParserEntry::of::<Tagging, _, _>(["json"])]);
    config.add(fixture_path("layered/10-base.json")).unwrap();

    assert_eq!(config.get("parsed_by"), Some(&json!("tagging")));
}

#[test]
fn test_add_parsers_after_first_parse_is_pinned() {
    let temp_dir = TempDir::new().unwrap();
    let later = create_temp_config(temp_dir.path(), "later.json", r#"{"later": true}"#);

    let mut config = Config::from_sources(fixture_path("layered/10-base.json")).unwrap();
    config.add_parsers([ParserEntry::of::<Tagging, _, _>(["json"])]);
    config.add(later).unwrap();

    assert!(config.has("later"));
    assert!(!config.has("parsed_by"));
}

#[test]
fn test_add_parsers_for_new_extension() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_temp_config(temp_dir.path(), "app.toml", "[server]\nport = 8080\n");

    let mut config = Config::new();
    config.add_parsers([ParserEntry::of::<TomlParser, _, _>(["toml"])]);
    config.add(file).unwrap();

    assert_eq!(config.get_as::<u16, _>("server.port").unwrap(), Some(8080));
}

#[test]
fn test_add_dumpers_overrides_builtin() {
    let mut config = Config::new();
    config.set("name", json!("demo"));
    config.add_dumpers([DumperEntry::of::<TomlDumper, _, _>(["json"])]);

    assert_eq!(config.dump("json").unwrap().trim(), "name = \"demo\"");
}

// ============================================================================
// Dumping
// ============================================================================

#[test]
fn test_dump_round_trips_through_each_format() {
    let config = Config::from_sources(fixture_path("layered")).unwrap();
    let temp_dir = TempDir::new().unwrap();

    for ext in ["json", "yml", "yaml", "ini", "php"] {
        let out = config.dump(ext).unwrap();
        let file = create_temp_config(temp_dir.path(), &format!("dumped.{ext}"), &out);

        let reloaded = Config::from_sources(file).unwrap();
        assert_eq!(tree(&reloaded), tree(&config), "round trip through {ext}");
    }
}

#[test]
fn test_dump_php_layout() {
    let mut config = Config::new();
    config.set("app.name", json!("demo"));

    assert_eq!(
        config.dump("php").unwrap(),
        "<?php return\narray (\n  'app' => \n  array (\n    'name' => 'demo',\n  ),\n);"
    );
}
