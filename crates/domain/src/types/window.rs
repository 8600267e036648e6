//! Query window supplied by the caller for one run

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DegreedError, Result};

/// How an endpoint consumes the caller's [`QueryWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Full snapshot: both filter parameters are sent as explicit nulls.
    ExplicitNull,
    /// Both bounds must be supplied and are sent verbatim.
    Required,
    /// No filter parameters are sent.
    Ignored,
}

/// Time window `{start_at, end_at}`; either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl QueryWindow {
    /// Window with no bounds (full snapshot).
    pub const fn unbounded() -> Self {
        Self { start_at: None, end_at: None }
    }

    /// Closed window; fails with `Config` when `start_at` is after `end_at`.
    pub fn between(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<Self> {
        if start_at > end_at {
            return Err(DegreedError::Config(format!(
                "window start {} is after end {}",
                format_bound(&start_at),
                format_bound(&end_at)
            )));
        }
        Ok(Self { start_at: Some(start_at), end_at: Some(end_at) })
    }

    /// Both bounds, or a `Config` error naming what is missing.
    pub fn require_bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => Ok((start, end)),
            (None, _) => Err(DegreedError::Config("window start_at is required".into())),
            (_, None) => Err(DegreedError::Config("window end_at is required".into())),
        }
    }
}

/// Wire format for a window bound: RFC 3339, whole seconds, `Z` suffix.
pub fn format_bound(bound: &DateTime<Utc>) -> String {
    bound.to_rfc3339_opts(SecondsFormat::Secs, true)
}
