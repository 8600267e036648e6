//! Secret providers
//!
//! `EnvSecretProvider` maps a secret name like `client_id` onto
//! `<PREFIX>_CLIENT_ID`; `StaticSecretProvider` serves a fixed map.

use std::collections::HashMap;

use degreed_core::SecretProvider;
use degreed_domain::{DegreedError, Result, SecretsConfig};

/// Reads secrets from process environment variables
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    prefix: String,
}

impl EnvSecretProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn from_config(config: &SecretsConfig) -> Self {
        Self::new(config.env_prefix.clone())
    }

    /// Environment variable consulted for `name`.
    pub fn variable_for(&self, name: &str) -> String {
        let name = name.to_ascii_uppercase().replace(['-', '.'], "_");
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}_{name}", self.prefix.to_ascii_uppercase())
        }
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get(&self, name: &str) -> Result<String> {
        let variable = self.variable_for(name);
        match std::env::var(&variable) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) => Err(DegreedError::Config(format!("secret {variable} is empty"))),
            Err(_) => Err(DegreedError::Config(format!("secret {variable} is not set"))),
        }
    }
}

/// In-memory secrets, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    values: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl SecretProvider for StaticSecretProvider {
    fn get(&self, name: &str) -> Result<String> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| DegreedError::Config(format!("secret '{name}' is not configured")))
    }
}
