//! Cursor-following pagination
//!
//! The first request carries the query parameters; every following request
//! uses the server-supplied `links.next` URL verbatim. The loop ends when a
//! page has no `next` link, and is bounded by a hard page cap so a
//! misbehaving upstream cannot keep it running.

use std::collections::HashSet;
use std::time::Duration;

use degreed_domain::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, PARAM_FILTER_END_DATE,
    PARAM_FILTER_START_DATE, PARAM_LIMIT,
};
use degreed_domain::{
    format_bound, ApiConfig, DegreedError, Endpoint, QueryParams, QueryWindow, Record, Result,
    WindowPolicy,
};
use tracing::{debug, info, instrument, warn};

use crate::ports::PageFetcher;

/// Knobs for one [`Paginator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    pub api_base: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub page_delay: Duration,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: Duration::ZERO,
        }
    }
}

impl From<&ApiConfig> for PaginationSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            api_base: config.base_url.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            page_delay: config.page_delay(),
        }
    }
}

/// Records gathered by one [`Paginator::fetch`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// Concatenated `data` arrays in page-then-within-page order.
    pub records: Vec<Record>,
    /// Pages that carried a body (zero when the resource was unavailable).
    pub pages_fetched: usize,
}

/// Build the first request's parameters for `endpoint`.
///
/// Always `limit`; `logins` adds the caller's window, `users` sends both
/// filters as explicit nulls, everything else sends no filters.
///
/// # Errors
/// `Config` when `logins` is missing a window bound.
pub fn initial_params(endpoint: Endpoint, window: &QueryWindow, page_size: u32) -> Result<QueryParams> {
    let params = QueryParams::new().with(PARAM_LIMIT, page_size.to_string());

    let params = match endpoint.window_policy() {
        WindowPolicy::ExplicitNull => {
            params.with_null(PARAM_FILTER_START_DATE).with_null(PARAM_FILTER_END_DATE)
        }
        WindowPolicy::Required => {
            let (start_at, end_at) = window.require_bounds().map_err(|e| match e {
                DegreedError::Config(message) => {
                    DegreedError::Config(format!("{endpoint} extraction: {message}"))
                }
                other => other,
            })?;
            params
                .with(PARAM_FILTER_START_DATE, format_bound(&start_at))
                .with(PARAM_FILTER_END_DATE, format_bound(&end_at))
        }
        WindowPolicy::Ignored => params,
    };

    Ok(params)
}

/// Drives repeated [`PageFetcher::get`] calls until the cursor is exhausted
pub struct Paginator<F> {
    fetcher: F,
    settings: PaginationSettings,
}

impl<F: PageFetcher> Paginator<F> {
    pub fn new(fetcher: F, settings: PaginationSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Every record of `endpoint` for `window`, in response order.
    ///
    /// # Errors
    /// See [`Paginator::fetch`].
    pub fn fetch_all(&mut self, endpoint: Endpoint, window: &QueryWindow) -> Result<Vec<Record>> {
        self.fetch(endpoint, window).map(|outcome| outcome.records)
    }

    /// Like [`Paginator::fetch_all`], also reporting how many pages were read.
    ///
    /// # Errors
    /// - `Config` for a missing `logins` window (before any request)
    /// - any fetcher error, unchanged
    /// - `Decode` when a body is not a page, or a page after the first has no body
    /// - `PageLimitExceeded` when more than `max_pages` pages are offered
    /// - `PaginationCycle` when a `next` link points at a page already read
    #[instrument(skip(self, endpoint, window), fields(endpoint = %endpoint))]
    pub fn fetch(&mut self, endpoint: Endpoint, window: &QueryWindow) -> Result<FetchOutcome> {
        let params = initial_params(endpoint, window, self.settings.page_size)?;
        let url = endpoint.resource_url(&self.settings.api_base);

        info!(url = %url, params = ?params, "starting pagination");

        let Some(mut page) = self.fetcher.get(&url, Some(&params))?.into_page()? else {
            info!(url = %url, "resource unavailable");
            return Ok(FetchOutcome::default());
        };

        let mut records = Vec::new();
        let mut pages_fetched = 1;
        let mut visited = HashSet::from([url]);

        loop {
            debug!(page = pages_fetched, records = page.data.len(), "page received");
            let next = page.next_link().map(str::to_owned);
            records.append(&mut page.data);

            let Some(next) = next else {
                break;
            };

            if !visited.insert(next.clone()) {
                return Err(DegreedError::PaginationCycle { url: next });
            }
            if pages_fetched >= self.settings.max_pages {
                return Err(DegreedError::PageLimitExceeded { limit: self.settings.max_pages });
            }
            if !self.settings.page_delay.is_zero() {
                std::thread::sleep(self.settings.page_delay);
            }

            let Some(following) = self.fetcher.get(&next, None)?.into_page()? else {
                warn!(url = %next, "follow-up page had no body");
                return Err(DegreedError::Decode(format!("follow-up page {next} had no body")));
            };
            page = following;
            pages_fetched += 1;
        }

        info!(pages = pages_fetched, records = records.len(), "pagination complete");
        Ok(FetchOutcome { records, pages_fetched })
    }
}
