//! Deterministic test doubles for the extraction ports
//!
//! Compiled for this crate's tests and for downstream crates that enable the
//! `test-utils` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use degreed_domain::{DegreedError, QueryParams, ResponseBody, Result};
use serde_json::Value;

use crate::ports::{Clock, PageFetcher};

/// Manually driven clock; clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One request observed by [`ScriptedFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Option<QueryParams>,
}

/// In-memory [`PageFetcher`] answering from per-URL scripts.
///
/// Each URL holds a queue of responses; the last one repeats once the queue
/// is drained. Unscripted URLs fail with `Internal`.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: HashMap<String, VecDeque<Result<ResponseBody>>>,
    requests: Vec<RecordedRequest>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a JSON body for `url`.
    #[must_use]
    pub fn page(self, url: impl Into<String>, body: Value) -> Self {
        self.respond(url, Ok(ResponseBody::from_value(body)))
    }

    /// Script an empty body for `url`.
    #[must_use]
    pub fn unavailable(self, url: impl Into<String>) -> Self {
        self.respond(url, Ok(ResponseBody::Unavailable))
    }

    /// Script a failure for `url`.
    #[must_use]
    pub fn failure(self, url: impl Into<String>, error: DegreedError) -> Self {
        self.respond(url, Err(error))
    }

    #[must_use]
    pub fn respond(mut self, url: impl Into<String>, response: Result<ResponseBody>) -> Self {
        self.scripts.entry(url.into()).or_default().push_back(response);
        self
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn get(&mut self, url: &str, query: Option<&QueryParams>) -> Result<ResponseBody> {
        self.requests.push(RecordedRequest { url: url.to_string(), query: query.cloned() });

        let queue = self
            .scripts
            .get_mut(url)
            .ok_or_else(|| DegreedError::Internal(format!("unexpected request to {url}")))?;

        match queue.len() {
            0 => Err(DegreedError::Internal(format!("script for {url} is empty"))),
            1 => queue[0].clone(),
            _ => queue
                .pop_front()
                .unwrap_or_else(|| Err(DegreedError::Internal(format!("script for {url} is empty")))),
        }
    }
}
