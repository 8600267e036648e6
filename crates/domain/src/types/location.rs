//! Destination of an extraction's output file

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint::Endpoint;
use crate::errors::{DegreedError, Result};

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Bucket + key naming one object in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Fails with `Config` on an empty bucket/key, a bucket that is not a
    /// single plain name, or a key that escapes the bucket (`..` segments,
    /// absolute paths).
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();

        if bucket.trim().is_empty() {
            return Err(DegreedError::Config("destination bucket is empty".into()));
        }
        if bucket.contains(SEPARATORS)
            || bucket.contains(':')
            || matches!(bucket.as_str(), "." | "..")
        {
            return Err(DegreedError::Config(format!(
                "destination bucket '{bucket}' must be a single name"
            )));
        }
        if key.trim().is_empty() {
            return Err(DegreedError::Config("destination key is empty".into()));
        }
        if key.starts_with(SEPARATORS)
            || key.contains(':')
            || key.split(SEPARATORS).any(|segment| segment == "..")
        {
            return Err(DegreedError::Config(format!("destination key '{key}' is not relative")));
        }

        Ok(Self { bucket, key })
    }

    /// Default layout: `degreed/<schema>/<endpoint>_<YYYYMMDDTHHMMSS>.json`.
    pub fn for_run(
        bucket: impl Into<String>,
        schema: &str,
        endpoint: Endpoint,
        run_ts: DateTime<Utc>,
    ) -> Result<Self> {
        let key = format!("degreed/{schema}/{endpoint}_{}.json", run_ts.format("%Y%m%dT%H%M%S"));
        Self::new(bucket, key)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// What a sink persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReceipt {
    pub location: ObjectLocation,
    pub rows_written: usize,
    pub bytes_written: u64,
}
