//! Token acquisition over HTTP

pub mod oauth;

pub use oauth::OAuthTokenEndpoint;
