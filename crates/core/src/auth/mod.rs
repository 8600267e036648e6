//! Client-credentials authentication
//!
//! - [`load_credentials`] resolves the id/secret pair from a secrets provider
//! - [`TokenCache`] holds one bearer token and refreshes it lazily

pub mod credentials;
pub mod token_cache;

pub use credentials::load_credentials;
pub use token_cache::TokenCache;
