//! Error types used throughout the extraction workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`DegreedError`] for caller-side policy
/// (retry, alerting, skip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad or missing input, no network attempted
    Configuration,
    /// Token endpoint rejected the client
    Authentication,
    /// Connection reset, timeout, DNS failure - retryable by the caller
    TransientNetwork,
    /// Resource endpoint answered with a non-2xx or a malformed body
    Upstream,
    /// Local sink could not persist the rows
    Sink,
    /// Invariant violation inside the workspace
    Internal,
}

/// Main error type for Degreed extraction
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum DegreedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error{}: {message}", status_suffix(.status))]
    Auth { status: Option<u16>, message: String },

    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    #[error("Upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Pagination exceeded the limit of {limit} pages")]
    PageLimitExceeded { limit: usize },

    #[error("Pagination cycle detected at {url}")]
    PaginationCycle { url: String },

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DegreedError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Auth { .. } => ErrorCategory::Authentication,
            Self::TransientNetwork(_) => ErrorCategory::TransientNetwork,
            Self::Upstream { .. }
            | Self::Decode(_)
            | Self::PageLimitExceeded { .. }
            | Self::PaginationCycle { .. } => ErrorCategory::Upstream,
            Self::Sink(_) => ErrorCategory::Sink,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Whether the orchestrator may retry the whole extraction.
    ///
    /// Nothing inside the workspace retries; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::TransientNetwork
    }

    /// Stable label suitable for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth { .. } => "auth",
            Self::TransientNetwork(_) => "transient_network",
            Self::Upstream { .. } => "upstream",
            Self::Decode(_) => "decode",
            Self::PageLimitExceeded { .. } => "page_limit_exceeded",
            Self::PaginationCycle { .. } => "pagination_cycle",
            Self::Sink(_) => "sink",
            Self::Internal(_) => "internal",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({code})")).unwrap_or_default()
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, DegreedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_network_is_retryable() {
        assert!(DegreedError::TransientNetwork("reset".into()).is_retryable());
        assert!(!DegreedError::Config("missing".into()).is_retryable());
        assert!(!DegreedError::Upstream { status: 503, body: String::new() }.is_retryable());
        assert!(!DegreedError::Auth { status: Some(401), message: "no".into() }.is_retryable());
        assert!(!DegreedError::PageLimitExceeded { limit: 3 }.is_retryable());
    }

    #[test]
    fn categories_group_pagination_failures_as_upstream() {
        assert_eq!(
            DegreedError::PaginationCycle { url: "https://x".into() }.category(),
            ErrorCategory::Upstream
        );
        assert_eq!(DegreedError::Decode("bad".into()).category(), ErrorCategory::Upstream);
        assert_eq!(DegreedError::Sink("disk".into()).category(), ErrorCategory::Sink);
    }

    #[test]
    fn auth_display_includes_status_when_known() {
        let err = DegreedError::Auth { status: Some(401), message: "invalid_client".into() };
        assert_eq!(err.to_string(), "Authentication error (401): invalid_client");

        let err = DegreedError::Auth { status: None, message: "malformed token".into() };
        assert_eq!(err.to_string(), "Authentication error: malformed token");
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = DegreedError::Upstream { status: 404, body: "gone".into() };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Upstream");
        assert_eq!(json["detail"]["status"], 404);
    }
}
