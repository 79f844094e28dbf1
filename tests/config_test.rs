// tests/config_test.rs
use ci_tagger::config::{load_config, parse_config, Config};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    let backend = config.service("backend").unwrap();
    assert_eq!(backend.image, "backend");
    assert_eq!(backend.image_ref("1.2.3"), "docker.io/luxe/backend:1.2.3");
    assert_eq!(config.release.remote, "origin");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[release]
default_branch = "master"
first_release_commit_threshold = 5

[services.api]
registry = "ghcr.io/acme"
image = "api"
context = "services/api"
build_triggers = ["^master$", "^PR-"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.release.default_branch, "master");
    assert_eq!(config.release.remote, "origin");
    assert_eq!(config.release.first_release_commit_threshold, 5);

    let api = config.service("api").unwrap();
    assert_eq!(api.context, "services/api");
    assert_eq!(api.dockerfile, None);
    assert!(api.build_triggers().unwrap().matches("master"));
    assert!(!api.build_triggers().unwrap().matches("develop"));

    // An explicit services table replaces the defaults
    assert!(config.service("backend").is_err());
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_default_build_triggers_applied_per_service() {
    let config = parse_config(
        r#"
[services.worker]
registry = "r"
image = "worker"
"#,
    )
    .unwrap();
    let triggers = config.service("worker").unwrap().build_triggers().unwrap();
    assert!(triggers.matches("main"));
    assert!(triggers.matches("release/1.0.0"));
    assert!(!triggers.matches("spike/idea"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = parse_config("[release\n").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_config(Some("/nonexistent/citagger.toml")).unwrap_err();
    assert!(err.to_string().contains("I/O error"));
}
