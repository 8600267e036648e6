//! OAuth2 client-credentials token endpoint
//!
//! Posts `grant_type=client_credentials` with the client id, secret and
//! space-separated scopes as a form body, and decodes the JSON grant.

use degreed_core::TokenEndpoint;
use degreed_domain::{ApiConfig, Credentials, DegreedError, Result, TokenGrant};
use reqwest::Method;
use tracing::{info, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Token endpoint reached over HTTP
#[derive(Debug, Clone)]
pub struct OAuthTokenEndpoint {
    http: HttpClient,
    token_url: String,
}

impl OAuthTokenEndpoint {
    pub fn new(http: HttpClient, token_url: impl Into<String>) -> Self {
        Self { http, token_url: token_url.into() }
    }

    pub fn from_config(http: HttpClient, config: &ApiConfig) -> Self {
        Self::new(http, config.token_url.clone())
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl TokenEndpoint for OAuthTokenEndpoint {
    #[instrument(skip(self, credentials, scopes), fields(token_url = %self.token_url))]
    fn request_token(&self, credentials: &Credentials, scopes: &[String]) -> Result<TokenGrant> {
        let scope = scopes.join(" ");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
            ("scope", scope.as_str()),
        ];

        let response = self.http.send(self.http.request(Method::POST, &self.token_url).form(&form))?;

        let status = response.status();
        if !status.is_success() {
            let body = rejection_message(response.text());
            warn!(status = status.as_u16(), "token request rejected");
            return Err(DegreedError::Auth { status: Some(status.as_u16()), message: body });
        }

        let text = response.text().map_err(|e| DegreedError::from(InfraError::from(e)))?;
        let grant: TokenGrant = serde_json::from_str(&text).map_err(|e| DegreedError::Auth {
            status: None,
            message: format!("failed to parse token response: {e}"),
        })?;

        info!(expires_in = ?grant.expires_in, "token granted");
        Ok(grant)
    }
}

/// Body of a rejected token request, or why it could not be read.
fn rejection_message<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

#[cfg(test)]
mod tests {
    use degreed_core::TokenCache;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn unreadable_rejection_body_is_reported() {
        let failed: std::result::Result<String, std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer"));

        assert_eq!(rejection_message(failed), "<unreadable body: reset by peer>");
        assert_eq!(rejection_message(Ok::<_, std::io::Error>("invalid_client".into())), "invalid_client");
    }

    fn credentials() -> Credentials {
        Credentials::new("client-1", "s3cret").unwrap()
    }

    fn scopes() -> Vec<String> {
        vec!["users:read".into(), "logins:read".into()]
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn posts_client_credentials_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-1"))
            .and(body_string_contains("client_secret=s3cret"))
            .and(body_string_contains("scope=users%3Aread+logins%3Aread"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "abc", "expires_in": 3600})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let token_url = format!("{}/oauth/token", server.uri());

        let grant = tokio::task::spawn_blocking(move || {
            let endpoint = OAuthTokenEndpoint::new(HttpClient::new().unwrap(), token_url);
            endpoint.request_token(&credentials(), &scopes())
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(grant.access_token, "abc");
        assert_eq!(grant.expires_in, Some(3600));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_credentials_are_auth_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;
        let token_url = format!("{}/oauth/token", server.uri());

        let err = tokio::task::spawn_blocking(move || {
            let endpoint = OAuthTokenEndpoint::new(HttpClient::new().unwrap(), token_url);
            endpoint.request_token(&credentials(), &scopes())
        })
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(
            err,
            DegreedError::Auth { status: Some(401), message: "invalid_client".into() }
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_grant_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        let token_url = format!("{}/oauth/token", server.uri());

        let err = tokio::task::spawn_blocking(move || {
            let endpoint = OAuthTokenEndpoint::new(HttpClient::new().unwrap(), token_url);
            endpoint.request_token(&credentials(), &scopes())
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(err, DegreedError::Auth { status: None, .. }), "got {err:?}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn token_cache_reuses_grant_across_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "abc", "expires_in": 3600})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let token_url = format!("{}/oauth/token", server.uri());

        let (first, second) = tokio::task::spawn_blocking(move || {
            let endpoint = OAuthTokenEndpoint::new(HttpClient::new().unwrap(), token_url);
            let mut cache = TokenCache::new(endpoint, credentials(), scopes());
            (cache.get_valid_token().unwrap(), cache.get_valid_token().unwrap())
        })
        .await
        .unwrap();

        assert_eq!(first.access_token, "abc");
        assert_eq!(first, second);
    }
}
