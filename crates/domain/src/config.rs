//! Configuration structures
//!
//! Every field has a default so a partial file (or none at all) still
//! yields a usable configuration; only credentials are mandatory, and they
//! come from the secrets provider rather than from here.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SCOPES, DEFAULT_TOKEN_URL, DEFAULT_USER_AGENT,
};
use crate::errors::{DegreedError, Result};

/// Top-level configuration for one extraction process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub api: ApiConfig,
    pub secrets: SecretsConfig,
    pub sink: SinkConfig,
}

impl ExtractorConfig {
    /// Reject values that would make every run fail or loop forever.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()
    }
}

/// Upstream API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
    pub page_size: u32,
    pub max_pages: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Pause between page requests; zero disables it.
    pub page_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_delay_ms: 0,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(DegreedError::Config("api.base_url must not be empty".into()));
        }
        if self.token_url.trim().is_empty() {
            return Err(DegreedError::Config("api.token_url must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(DegreedError::Config("api.page_size must be positive".into()));
        }
        if self.max_pages == 0 {
            return Err(DegreedError::Config("api.max_pages must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(DegreedError::Config("api.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Where credentials are looked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Prefix for `<PREFIX>_CLIENT_ID` / `<PREFIX>_CLIENT_SECRET`.
    pub env_prefix: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self { env_prefix: "DEGREED".to_string() }
    }
}

/// Local object-storage stand-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Directory under which `<bucket>/<key>` objects are written.
    pub output_root: PathBuf,
    pub bucket: String,
    /// Dataset segment of the default object key (`degreed/<schema>/...`).
    pub schema: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("./output"),
            bucket: "degreed_data".to_string(),
            schema: "degreed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_degreed_v2() {
        let config = ExtractorConfig::default();
        assert_eq!(config.api.base_url, "https://api.degreed.com/api/v2");
        assert_eq!(config.api.page_size, 1000);
        assert_eq!(config.api.scopes.len(), 6);
        assert_eq!(config.secrets.env_prefix, "DEGREED");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_page_cap() {
        let mut config = ExtractorConfig::default();
        config.api.max_pages = 0;
        assert!(matches!(config.validate(), Err(DegreedError::Config(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ExtractorConfig =
            serde_json::from_str(r#"{"api": {"page_size": 50}}"#).unwrap();
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.api.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.sink.bucket, "degreed_data");
    }
}
