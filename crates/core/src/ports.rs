//! Port interfaces for extraction
//!
//! All ports are synchronous: a run issues one blocking request at a time
//! and every page URL depends on the previous response.

use chrono::{DateTime, Utc};
use degreed_domain::{
    Credentials, Dataset, ObjectLocation, QueryParams, ResponseBody, Result, SinkReceipt, Token,
    TokenGrant,
};

/// Source of "now" for token expiry decisions
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// OAuth2 token endpoint speaking the client-credentials grant
pub trait TokenEndpoint {
    /// Exchange credentials for a fresh grant.
    ///
    /// Rejections surface as `Auth`, connection failures as
    /// `TransientNetwork`.
    fn request_token(&self, credentials: &Credentials, scopes: &[String]) -> Result<TokenGrant>;
}

/// Trait for providing access tokens
///
/// Implementations refresh as needed; callers only attach the result.
pub trait AccessTokenProvider {
    fn access_token(&mut self) -> Result<Token>;
}

/// Authenticated GET against the resource API
pub trait PageFetcher {
    /// Fetch `url`, adding `query` when given.
    ///
    /// Returns [`ResponseBody::Unavailable`] for an empty body rather than
    /// an error.
    fn get(&mut self, url: &str, query: Option<&QueryParams>) -> Result<ResponseBody>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &mut T {
    fn get(&mut self, url: &str, query: Option<&QueryParams>) -> Result<ResponseBody> {
        (**self).get(url, query)
    }
}

impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    fn get(&mut self, url: &str, query: Option<&QueryParams>) -> Result<ResponseBody> {
        (**self).get(url, query)
    }
}

/// Synchronous key-value secrets lookup
pub trait SecretProvider {
    /// Value for `name`; a missing entry is a `Config` error.
    fn get(&self, name: &str) -> Result<String>;
}

/// Destination for a finished dataset
pub trait RowSink {
    /// Persist every row of `dataset` at `location`, or nothing at all.
    fn write(&mut self, location: &ObjectLocation, dataset: &Dataset) -> Result<SinkReceipt>;
}
