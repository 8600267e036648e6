//! Configuration loader
//!
//! Builds an [`ExtractorConfig`] from defaults, an optional config file and
//! `DEGREED_*` environment variables.
//!
//! ## Loading Strategy
//! 1. Start from a file: the explicit path if given, else the first probed
//!    location, else built-in defaults
//! 2. Overlay any `DEGREED_*` environment variables that are set
//! 3. Validate the result
//!
//! ## Environment Variables
//! - `DEGREED_API_BASE_URL`: Resource API root
//! - `DEGREED_TOKEN_URL`: OAuth2 token endpoint
//! - `DEGREED_SCOPES`: Space- or comma-separated scopes
//! - `DEGREED_PAGE_SIZE`: `limit` sent on the first request
//! - `DEGREED_MAX_PAGES`: Hard page cap per extraction
//! - `DEGREED_TIMEOUT_SECS`: Per-request timeout
//! - `DEGREED_PAGE_DELAY_MS`: Pause between page requests
//! - `DEGREED_USER_AGENT`: `User-Agent` header
//! - `DEGREED_SECRETS_PREFIX`: Prefix of the credential variables
//! - `DEGREED_OUTPUT_ROOT`: Local directory standing in for object storage
//! - `DEGREED_BUCKET`: Bucket segment of written objects
//! - `DEGREED_SCHEMA`: Dataset segment of the default object key
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` and `./degreed.{json,toml}` (current working
//!    directory)
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use degreed_domain::{DegreedError, ExtractorConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "degreed.json", "degreed.toml"];

/// Load configuration with the full layering strategy
///
/// # Errors
/// Returns `DegreedError::Config` if:
/// - `path` is given but does not exist
/// - A config file cannot be read or parsed
/// - An environment variable holds an invalid value
/// - The merged configuration fails validation
pub fn load(path: Option<PathBuf>) -> Result<ExtractorConfig> {
    let base = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                ExtractorConfig::default()
            }
        },
    };

    let config = apply_env_overrides(base, |key| std::env::var(key).ok())?;
    config.validate()?;

    tracing::info!(
        base_url = %config.api.base_url,
        page_size = config.api.page_size,
        max_pages = config.api.max_pages,
        "Configuration loaded"
    );
    Ok(config)
}

/// Defaults overlaid with environment variables, no file involved.
///
/// # Errors
/// Returns `DegreedError::Config` for unparsable values.
pub fn load_from_env() -> Result<ExtractorConfig> {
    apply_env_overrides(ExtractorConfig::default(), |key| std::env::var(key).ok())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is chosen by
/// extension (`.json` or `.toml`); missing fields take their defaults.
///
/// # Errors
/// Returns `DegreedError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ExtractorConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DegreedError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DegreedError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DegreedError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ExtractorConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DegreedError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DegreedError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DegreedError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Overlay every `DEGREED_*` variable `lookup` knows about onto `config`.
///
/// # Errors
/// Returns `DegreedError::Config` naming the variable with an invalid value.
pub fn apply_env_overrides<F>(mut config: ExtractorConfig, lookup: F) -> Result<ExtractorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(value) = get("DEGREED_API_BASE_URL") {
        config.api.base_url = value;
    }
    if let Some(value) = get("DEGREED_TOKEN_URL") {
        config.api.token_url = value;
    }
    if let Some(value) = get("DEGREED_SCOPES") {
        config.api.scopes = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(value) = get("DEGREED_PAGE_SIZE") {
        config.api.page_size = parse_var("DEGREED_PAGE_SIZE", &value)?;
    }
    if let Some(value) = get("DEGREED_MAX_PAGES") {
        config.api.max_pages = parse_var("DEGREED_MAX_PAGES", &value)?;
    }
    if let Some(value) = get("DEGREED_TIMEOUT_SECS") {
        config.api.timeout_secs = parse_var("DEGREED_TIMEOUT_SECS", &value)?;
    }
    if let Some(value) = get("DEGREED_PAGE_DELAY_MS") {
        config.api.page_delay_ms = parse_var("DEGREED_PAGE_DELAY_MS", &value)?;
    }
    if let Some(value) = get("DEGREED_USER_AGENT") {
        config.api.user_agent = value;
    }
    if let Some(value) = get("DEGREED_SECRETS_PREFIX") {
        config.secrets.env_prefix = value;
    }
    if let Some(value) = get("DEGREED_OUTPUT_ROOT") {
        config.sink.output_root = PathBuf::from(value);
    }
    if let Some(value) = get("DEGREED_BUCKET") {
        config.sink.bucket = value;
    }
    if let Some(value) = get("DEGREED_SCHEMA") {
        config.sink.schema = value;
    }

    Ok(config)
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| DegreedError::Config(format!("Invalid value for {key}: {e}")))
}
