//! OAuth2 client-credentials types
//!
//! Credentials are injected once per run; tokens are produced by the token
//! endpoint and replaced wholesale on refresh.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::errors::{DegreedError, Result};

/// Client id / secret pair for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Fails with `Config` when either half is empty or whitespace.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(DegreedError::Config("client_id is missing".into()));
        }
        if client_secret.trim().is_empty() {
            return Err(DegreedError::Config("client_secret is missing".into()));
        }

        Ok(Self { client_id, client_secret })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token with its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Build a token from a grant received at `issued_at`.
    ///
    /// A missing or non-positive `expires_in` yields a token that is already
    /// expired, so the next lookup refreshes it.
    pub fn from_grant(grant: TokenGrant, issued_at: DateTime<Utc>) -> Self {
        let lifetime = grant.expires_in.filter(|secs| *secs > 0).unwrap_or(0);
        Self { access_token: grant.access_token, expires_at: issued_at + Duration::seconds(lifetime) }
    }

    /// Valid only while `now + margin < expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 §5.1); extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}
