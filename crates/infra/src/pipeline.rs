//! One extraction run, end to end
//!
//! Resolves the endpoint and destination, builds a fresh token cache and API
//! client, pulls every page, and hands the flattened rows to a [`RowSink`].
//! Rows reach the sink only when the whole extraction succeeded and produced
//! at least one row.

use chrono::{DateTime, Utc};
use degreed_core::{
    load_credentials, ExtractionRequest, ExtractionTask, Extractor, PageFetcher,
    PaginationSettings, RowSink, SecretProvider, TokenCache,
};
use degreed_domain::{Endpoint, ExtractorConfig, ObjectLocation, QueryWindow, Result};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::api::DegreedApiClient;
use crate::auth::OAuthTokenEndpoint;
use crate::http::HttpClient;

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    pub endpoint: String,
    pub window: QueryWindow,
    /// Explicit destination; derived from `run_ts` when absent.
    pub location: Option<ObjectLocation>,
    pub run_ts: DateTime<Utc>,
}

impl ExtractionJob {
    pub fn new(endpoint: impl Into<String>, window: QueryWindow, run_ts: DateTime<Utc>) -> Self {
        Self { endpoint: endpoint.into(), window, location: None, run_ts }
    }

    #[must_use]
    pub fn with_location(mut self, location: ObjectLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub endpoint: Endpoint,
    pub rows_written: usize,
    pub pages_fetched: usize,
    /// `None` when there was nothing to write.
    pub location: Option<ObjectLocation>,
}

/// Run `job` against the live API described by `config`.
///
/// # Errors
/// `Config` for an unknown endpoint, bad destination or missing secrets
/// (all before any network call); otherwise any extraction or sink error.
#[instrument(skip_all, fields(endpoint = %job.endpoint))]
pub fn run_extraction<S, K>(
    config: &ExtractorConfig,
    secrets: &S,
    sink: &mut K,
    job: &ExtractionJob,
) -> Result<ExtractionReport>
where
    S: SecretProvider + ?Sized,
    K: RowSink + ?Sized,
{
    let (request, location) = resolve(config, job)?;
    let credentials = load_credentials(secrets)?;

    let http = HttpClient::from_config(&config.api)?;
    let tokens = TokenCache::new(
        OAuthTokenEndpoint::from_config(http.clone(), &config.api),
        credentials,
        config.api.scopes.clone(),
    );
    let client = DegreedApiClient::new(http, tokens);

    deliver(client, PaginationSettings::from(&config.api), sink, &request, location)
}

/// Like [`run_extraction`], with the page source supplied by the caller.
///
/// # Errors
/// As [`run_extraction`], minus the credential and transport setup.
pub fn run_with_fetcher<F, K>(
    config: &ExtractorConfig,
    fetcher: F,
    sink: &mut K,
    job: &ExtractionJob,
) -> Result<ExtractionReport>
where
    F: PageFetcher,
    K: RowSink + ?Sized,
{
    let (request, location) = resolve(config, job)?;
    deliver(fetcher, PaginationSettings::from(&config.api), sink, &request, location)
}

fn resolve(config: &ExtractorConfig, job: &ExtractionJob) -> Result<(ExtractionRequest, ObjectLocation)> {
    let request = ExtractionRequest::parse(&job.endpoint, job.window)?;
    let location = match &job.location {
        Some(location) => location.clone(),
        None => ObjectLocation::for_run(
            config.sink.bucket.clone(),
            &config.sink.schema,
            request.endpoint,
            job.run_ts,
        )?,
    };
    Ok((request, location))
}

fn deliver<F, K>(
    fetcher: F,
    settings: PaginationSettings,
    sink: &mut K,
    request: &ExtractionRequest,
    location: ObjectLocation,
) -> Result<ExtractionReport>
where
    F: PageFetcher,
    K: RowSink + ?Sized,
{
    let mut extractor = Extractor::new(fetcher, settings);
    let dataset = extractor.execute(request).map_err(|e| {
        error!(error = %e, kind = e.label(), retryable = e.is_retryable(), "extraction failed");
        e
    })?;

    if dataset.is_empty() {
        info!("nothing to write");
        return Ok(ExtractionReport {
            endpoint: request.endpoint,
            rows_written: 0,
            pages_fetched: dataset.pages_fetched,
            location: None,
        });
    }

    let receipt = sink.write(&location, &dataset)?;
    info!(location = %receipt.location, rows = receipt.rows_written, "extraction delivered");

    Ok(ExtractionReport {
        endpoint: request.endpoint,
        rows_written: receipt.rows_written,
        pages_fetched: dataset.pages_fetched,
        location: Some(receipt.location),
    })
}
