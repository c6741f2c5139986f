//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;
use std::path::PathBuf;

use rocketfuel_infra::config;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "credentials": {
            "client_id": "integration-id",
            "client_secret": "integration-secret"
        },
        "api_base_url": "https://mc.rest.test",
        "auth_url": "https://mc.auth.test/v1/requestToken",
        "token_cache_path": "/tmp/integration_token.txt",
        "retry": {
            "max_attempts": 4,
            "delay_ms": 1000,
            "exponential": true
        },
        "timeout_secs": 20
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from JSON file");

    let config = result.unwrap();

    assert_eq!(config.credentials.client_id, "integration-id");
    assert_eq!(config.credentials.client_secret, "integration-secret");
    assert_eq!(config.api_base_url, "https://mc.rest.test");
    assert_eq!(config.auth_url, "https://mc.auth.test/v1/requestToken");
    assert_eq!(config.token_cache_path, Some(PathBuf::from("/tmp/integration_token.txt")));
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.retry.delay_ms, 1000);
    assert!(config.retry.exponential);
    assert_eq!(config.timeout_secs, Some(20));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file_with_defaults() {
    let toml_content = r#"
[credentials]
client_id = "toml-id"
client_secret = "toml-secret"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load TOML config");

    assert_eq!(config.credentials.client_id, "toml-id");
    assert_eq!(config.api_base_url, "https://www.exacttargetapis.com");
    assert_eq!(config.auth_url, "https://auth.exacttargetapis.com/v1/requestToken");
    assert_eq!(config.token_cache_path, None);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.delay_ms, 3000);
    assert!(!config.retry.exponential);
    assert_eq!(config.timeout_secs, None);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_invalid_toml() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"[credentials\nclient_id = ").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_err(), "Should fail with invalid TOML");

    std::fs::remove_file(path).ok();
}
