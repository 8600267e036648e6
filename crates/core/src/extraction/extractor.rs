//! Extraction entry point
//!
//! Validates the requested endpoint, drives the [`Paginator`] and flattens
//! the result into a [`Dataset`]. Persisting the rows is left to the caller.

use degreed_domain::{Dataset, Endpoint, QueryWindow, Result};
use tracing::{info, instrument};

use super::flatten::flatten_all;
use super::pagination::{PaginationSettings, Paginator};
use crate::ports::PageFetcher;

/// A validated request for one endpoint over one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub endpoint: Endpoint,
    pub window: QueryWindow,
}

impl ExtractionRequest {
    pub fn new(endpoint: Endpoint, window: QueryWindow) -> Self {
        Self { endpoint, window }
    }

    /// Resolve `endpoint_name` against the supported set.
    ///
    /// # Errors
    /// `Config` naming the rejected input and the supported endpoints.
    pub fn parse(endpoint_name: &str, window: QueryWindow) -> Result<Self> {
        Ok(Self::new(endpoint_name.parse()?, window))
    }
}

/// Something the orchestrator can hand a request and get rows back from
pub trait ExtractionTask {
    fn execute(&mut self, request: &ExtractionRequest) -> Result<Dataset>;
}

/// Composes pagination and flattening for a single run
pub struct Extractor<F> {
    paginator: Paginator<F>,
}

impl<F: PageFetcher> Extractor<F> {
    pub fn new(fetcher: F, settings: PaginationSettings) -> Self {
        Self { paginator: Paginator::new(fetcher, settings) }
    }

    pub fn fetcher(&self) -> &F {
        self.paginator.fetcher()
    }

    /// Extract `endpoint_name` for `window`.
    ///
    /// Fails with `Config` before any request when the name is unknown.
    /// An empty result is a successful, empty [`Dataset`].
    ///
    /// # Errors
    /// Anything raised by [`Paginator::fetch`].
    pub fn run(&mut self, endpoint_name: &str, window: QueryWindow) -> Result<Dataset> {
        let request = ExtractionRequest::parse(endpoint_name, window)?;
        self.execute(&request)
    }
}

impl<F: PageFetcher> ExtractionTask for Extractor<F> {
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint))]
    fn execute(&mut self, request: &ExtractionRequest) -> Result<Dataset> {
        let outcome = self.paginator.fetch(request.endpoint, &request.window)?;
        let rows = flatten_all(&outcome.records);

        if rows.is_empty() {
            info!(pages = outcome.pages_fetched, "no records pulled");
        } else {
            info!(rows = rows.len(), pages = outcome.pages_fetched, "extraction complete");
        }

        Ok(Dataset::new(request.endpoint, rows, outcome.pages_fetched))
    }
}
