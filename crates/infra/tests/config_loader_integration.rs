//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;
use std::path::PathBuf;

use degreed_infra::config;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "api": {
            "base_url": "https://api.eu.degreed.com/api/v2",
            "token_url": "https://eu.degreed.com/oauth/token",
            "scopes": ["users:read"],
            "page_size": 200,
            "max_pages": 50,
            "timeout_secs": 10
        },
        "secrets": { "env_prefix": "LMS" },
        "sink": { "output_root": "/tmp/degreed-out", "bucket": "landing", "schema": "raw" }
    }"#;

    let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().expect("temp file");
    temp_file.write_all(json_content.as_bytes()).expect("write config");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("config should load from JSON");

    assert_eq!(config.api.base_url, "https://api.eu.degreed.com/api/v2");
    assert_eq!(config.api.token_url, "https://eu.degreed.com/oauth/token");
    assert_eq!(config.api.scopes, vec!["users:read"]);
    assert_eq!(config.api.page_size, 200);
    assert_eq!(config.api.max_pages, 50);
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.secrets.env_prefix, "LMS");
    assert_eq!(config.sink.output_root, PathBuf::from("/tmp/degreed-out"));
    assert_eq!(config.sink.bucket, "landing");
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[api]
base_url = "https://api.test/v2"
page_delay_ms = 100

[sink]
schema = "degreed_stage"
"#;

    let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("write config");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("config should load from TOML");

    assert_eq!(config.api.base_url, "https://api.test/v2");
    assert_eq!(config.api.page_delay_ms, 100);
    assert_eq!(config.api.page_size, 1000);
    assert_eq!(config.sink.schema, "degreed_stage");
    assert_eq!(config.sink.bucket, "degreed_data");
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let mut temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("temp file");
    temp_file.write_all(b"api: {}").expect("write config");

    let result = config::load_from_file(Some(temp_file.path().to_path_buf()));
    assert!(result.is_err(), "yaml is not a supported format");
}
