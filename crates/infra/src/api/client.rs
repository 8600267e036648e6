//! Authenticated resource client
//!
//! Issues bearer-authenticated GETs against the Degreed API and classifies
//! each response as a JSON body, an empty ("unavailable") body, or an
//! upstream error.

use degreed_core::{AccessTokenProvider, PageFetcher};
use degreed_domain::{DegreedError, QueryParams, ResponseBody, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Resource client for the Degreed v2 API
pub struct DegreedApiClient<A> {
    http: HttpClient,
    auth: A,
}

impl<A: AccessTokenProvider> DegreedApiClient<A> {
    pub fn new(http: HttpClient, auth: A) -> Self {
        Self { http, auth }
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// GET `url` with `query` appended; see [`PageFetcher::get`].
    ///
    /// # Errors
    /// - `Auth` / `TransientNetwork` from the token provider
    /// - `TransientNetwork` for connection failures and timeouts
    /// - `Upstream` for any non-2xx status
    /// - `Decode` for a 2xx body that is not JSON
    #[instrument(skip(self, query))]
    pub fn get(&mut self, url: &str, query: Option<&QueryParams>) -> Result<ResponseBody> {
        let target = build_url(url, query)?;
        let token = self.auth.access_token()?;

        debug!(url = %target, "GET request");

        let request = self
            .http
            .request(Method::GET, target)
            .header(AUTHORIZATION, token.bearer_header())
            .header(CONTENT_TYPE, "application/json");
        let response = self.http.send(request)?;

        let status = response.status();
        let body = response.text().map_err(|e| DegreedError::from(InfraError::from(e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "upstream returned an error status");
            return Err(DegreedError::Upstream { status: status.as_u16(), body });
        }

        let parsed = ResponseBody::from_text(&body)?;
        if parsed.is_unavailable() {
            debug!(status = status.as_u16(), "empty response body");
        }
        Ok(parsed)
    }
}

impl<A: AccessTokenProvider> PageFetcher for DegreedApiClient<A> {
    fn get(&mut self, url: &str, query: Option<&QueryParams>) -> Result<ResponseBody> {
        DegreedApiClient::get(self, url, query)
    }
}

/// Append `query` to `url`; a null value is sent as `name=`.
///
/// A URL without a query is a `next` link taken from a response, so failing
/// to parse it is `Decode`; a configured resource URL that fails is `Config`.
fn build_url(url: &str, query: Option<&QueryParams>) -> Result<Url> {
    let mut target = Url::parse(url).map_err(|e| match query {
        Some(_) => DegreedError::Config(format!("invalid URL '{url}': {e}")),
        None => DegreedError::Decode(format!("invalid next link '{url}': {e}")),
    })?;

    if let Some(params) = query.filter(|params| !params.is_empty()) {
        let mut pairs = target.query_pairs_mut();
        for (name, value) in params.iter() {
            pairs.append_pair(name, value.unwrap_or_default());
        }
    }

    Ok(target)
}
