//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are not set there, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ROCKETFUEL_CLIENT_ID`: Client id (required)
//! - `ROCKETFUEL_CLIENT_SECRET`: Client secret (required)
//! - `ROCKETFUEL_TOKEN_CACHE`: Token cache file path
//! - `ROCKETFUEL_API_BASE_URL`: Protected API base URL
//! - `ROCKETFUEL_AUTH_URL`: Token endpoint URL
//! - `ROCKETFUEL_MAX_ATTEMPTS`: Attempts per request on connection failure
//! - `ROCKETFUEL_RETRY_DELAY_MS`: Delay after each connection failure
//! - `ROCKETFUEL_RETRY_EXPONENTIAL`: Exponential backoff (true/false)
//! - `ROCKETFUEL_TIMEOUT_SECS`: Transport timeout in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./rocketfuel.json` or `./rocketfuel.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rocketfuel_domain::{ClientConfig, Credentials, Result, RetryConfig, RocketFuelError};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["rocketfuel.json", "rocketfuel.toml", "config.json", "config.toml"];

const CLIENT_ID_VAR: &str = "ROCKETFUEL_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "ROCKETFUEL_CLIENT_SECRET";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the credentials are
/// not set there, falls back to loading from a config file.
///
/// # Errors
/// Returns `RocketFuelError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
    if env_opt(CLIENT_ID_VAR).is_none() || env_opt(CLIENT_SECRET_VAR).is_none() {
        tracing::debug!("Credentials not set in environment, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only the credentials are required; every other setting falls back to its
/// default when unset.
///
/// # Errors
/// Returns `RocketFuelError::Config` if a credential is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let client_id = env_var(CLIENT_ID_VAR)?;
    let client_secret = env_var(CLIENT_SECRET_VAR)?;

    let mut config = ClientConfig::new(Credentials::new(client_id, client_secret));

    if let Some(path) = env_opt("ROCKETFUEL_TOKEN_CACHE") {
        config.token_cache_path = Some(PathBuf::from(path));
    }
    if let Some(url) = env_opt("ROCKETFUEL_API_BASE_URL") {
        config.api_base_url = url;
    }
    if let Some(url) = env_opt("ROCKETFUEL_AUTH_URL") {
        config.auth_url = url;
    }

    let defaults = RetryConfig::default();
    config.retry = RetryConfig {
        max_attempts: env_parse("ROCKETFUEL_MAX_ATTEMPTS", "max attempts")?
            .unwrap_or(defaults.max_attempts),
        delay_ms: env_parse("ROCKETFUEL_RETRY_DELAY_MS", "retry delay")?
            .unwrap_or(defaults.delay_ms),
        exponential: env_bool("ROCKETFUEL_RETRY_EXPONENTIAL", defaults.exponential),
    };
    config.timeout_secs = env_parse("ROCKETFUEL_TIMEOUT_SECS", "timeout")?;

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RocketFuelError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RocketFuelError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RocketFuelError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RocketFuelError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RocketFuelError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RocketFuelError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RocketFuelError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, then the directory holding the
/// executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    candidate_paths(&dirs).into_iter().find(|path| path.is_file())
}

fn candidate_paths(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter().flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name))).collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `RocketFuelError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        RocketFuelError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional numeric environment variable
///
/// # Errors
/// Returns `RocketFuelError::Config` if the variable is set but invalid.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| RocketFuelError::Config(format!("Invalid {} in {}: {}", what, key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 9] = [
        "ROCKETFUEL_CLIENT_ID",
        "ROCKETFUEL_CLIENT_SECRET",
        "ROCKETFUEL_TOKEN_CACHE",
        "ROCKETFUEL_API_BASE_URL",
        "ROCKETFUEL_AUTH_URL",
        "ROCKETFUEL_MAX_ATTEMPTS",
        "ROCKETFUEL_RETRY_DELAY_MS",
        "ROCKETFUEL_RETRY_EXPONENTIAL",
        "ROCKETFUEL_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("ROCKETFUEL_TEST_BOOL_YES", "yes");
        std::env::set_var("ROCKETFUEL_TEST_BOOL_UPPER", "TRUE");
        std::env::set_var("ROCKETFUEL_TEST_BOOL_OFF", "off");

        assert!(env_bool("ROCKETFUEL_TEST_BOOL_YES", false));
        assert!(env_bool("ROCKETFUEL_TEST_BOOL_UPPER", false));
        assert!(!env_bool("ROCKETFUEL_TEST_BOOL_OFF", true));

        std::env::remove_var("ROCKETFUEL_TEST_BOOL_MISSING");
        assert!(env_bool("ROCKETFUEL_TEST_BOOL_MISSING", true));

        std::env::remove_var("ROCKETFUEL_TEST_BOOL_YES");
        std::env::remove_var("ROCKETFUEL_TEST_BOOL_UPPER");
        std::env::remove_var("ROCKETFUEL_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_credentials_only_uses_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROCKETFUEL_CLIENT_ID", "abc");
        std::env::set_var("ROCKETFUEL_CLIENT_SECRET", "xyz");

        let config = load_from_env().unwrap();
        assert_eq!(config, ClientConfig::new(Credentials::new("abc", "xyz")));

        clear_env();
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROCKETFUEL_CLIENT_ID", "abc");
        std::env::set_var("ROCKETFUEL_CLIENT_SECRET", "xyz");
        std::env::set_var("ROCKETFUEL_TOKEN_CACHE", "/tmp/rf-token.txt");
        std::env::set_var("ROCKETFUEL_API_BASE_URL", "https://mc.rest.test");
        std::env::set_var("ROCKETFUEL_AUTH_URL", "https://mc.auth.test/v1/requestToken");
        std::env::set_var("ROCKETFUEL_MAX_ATTEMPTS", "3");
        std::env::set_var("ROCKETFUEL_RETRY_DELAY_MS", "250");
        std::env::set_var("ROCKETFUEL_RETRY_EXPONENTIAL", "true");
        std::env::set_var("ROCKETFUEL_TIMEOUT_SECS", "30");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.credentials.client_id, "abc");
        assert_eq!(config.token_cache_path, Some(PathBuf::from("/tmp/rf-token.txt")));
        assert_eq!(config.api_base_url, "https://mc.rest.test");
        assert_eq!(config.auth_url, "https://mc.auth.test/v1/requestToken");
        assert_eq!(config.retry, RetryConfig { max_attempts: 3, delay_ms: 250, exponential: true });
        assert_eq!(config.timeout_secs, Some(30));

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_secret() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROCKETFUEL_CLIENT_ID", "abc");

        let err = load_from_env().unwrap_err();
        assert!(
            matches!(err, RocketFuelError::Config(ref msg) if msg.contains("ROCKETFUEL_CLIENT_SECRET")),
            "Should be a Config error naming the variable, got {err:?}"
        );

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROCKETFUEL_CLIENT_ID", "abc");
        std::env::set_var("ROCKETFUEL_CLIENT_SECRET", "xyz");
        std::env::set_var("ROCKETFUEL_MAX_ATTEMPTS", "five");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, RocketFuelError::Config(_)), "Should be a Config error");

        clear_env();
    }

    #[test]
    fn test_load_reports_env_error_when_credentials_are_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROCKETFUEL_CLIENT_ID", "abc");
        std::env::set_var("ROCKETFUEL_CLIENT_SECRET", "xyz");
        std::env::set_var("ROCKETFUEL_MAX_ATTEMPTS", "five");

        let err = load().unwrap_err();
        assert!(
            matches!(err, RocketFuelError::Config(ref msg) if msg.contains("ROCKETFUEL_MAX_ATTEMPTS")),
            "Should surface the parse error, got {err:?}"
        );

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = write_temp(
            r#"{
                "credentials": {"client_id": "abc", "client_secret": "xyz"},
                "retry": {"max_attempts": 2}
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.credentials, Credentials::new("abc", "xyz"));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay_ms, 3000);
        assert_eq!(config.token_cache_path, None);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = write_temp(
            r#"
api_base_url = "https://mc.rest.test"
token_cache_path = "/var/cache/rf-token.txt"
timeout_secs = 10

[credentials]
client_id = "abc"
client_secret = "xyz"

[retry]
exponential = true
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.api_base_url, "https://mc.rest.test");
        assert_eq!(config.token_cache_path, Some(PathBuf::from("/var/cache/rf-token.txt")));
        assert_eq!(config.timeout_secs, Some(10));
        assert!(config.retry.exponential);
        assert_eq!(config.retry.max_attempts, 5);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/rocketfuel.json")));
        assert!(matches!(result, Err(RocketFuelError::Config(_))));
    }

    #[test]
    fn test_load_from_file_missing_credentials() {
        let path = write_temp(r#"{"api_base_url": "https://mc.rest.test"}"#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(RocketFuelError::Config(_))));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("rocketfuel.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_candidate_paths_order() {
        let dirs = vec![PathBuf::from("/work"), PathBuf::from("/bin")];
        let paths = candidate_paths(&dirs);

        assert_eq!(paths.len(), 8);
        assert_eq!(paths[0], PathBuf::from("/work/rocketfuel.json"));
        assert_eq!(paths[3], PathBuf::from("/work/config.toml"));
        assert_eq!(paths[4], PathBuf::from("/bin/rocketfuel.json"));
    }
}
