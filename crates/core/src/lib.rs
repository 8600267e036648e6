//! # Degreed Core
//!
//! Pure extraction logic - no HTTP, filesystem or environment access.
//!
//! This crate contains:
//! - Port interfaces (traits) implemented by `degreed-infra`
//! - The OAuth2 token cache
//! - Cursor pagination, record flattening and the extraction entry point
//!
//! ## Architecture Principles
//! - Only depends on `degreed-domain`
//! - All I/O through the traits in [`ports`]
//! - Synchronous: one blocking request at a time per extraction

pub mod auth;
pub mod extraction;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{load_credentials, TokenCache};
pub use extraction::{
    flatten, flatten_all, ExtractionRequest, ExtractionTask, Extractor, FetchOutcome,
    PaginationSettings, Paginator,
};
pub use ports::{
    AccessTokenProvider, Clock, PageFetcher, RowSink, SecretProvider, SystemClock, TokenEndpoint,
};
