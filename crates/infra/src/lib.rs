//! # Degreed Infrastructure
//!
//! Infrastructure implementations of core extraction ports.
//!
//! This crate contains:
//! - Blocking HTTP transport (reqwest)
//! - OAuth2 client-credentials token endpoint
//! - Degreed resource API client
//! - Secret providers, configuration loading and the JSON-lines sink
//! - The end-to-end extraction pipeline
//!
//! ## Architecture
//! - Implements traits defined in `degreed-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod pipeline;
pub mod secrets;
pub mod sink;

// Re-export commonly used items
pub use api::DegreedApiClient;
pub use auth::OAuthTokenEndpoint;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use pipeline::{run_extraction, run_with_fetcher, ExtractionJob, ExtractionReport};
pub use secrets::{EnvSecretProvider, StaticSecretProvider};
pub use sink::JsonLinesSink;
