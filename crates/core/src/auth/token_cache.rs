//! Single-token cache with lazy refresh
//!
//! Owns exactly one bearer token for one extraction run. The token is
//! replaced wholesale when it is absent or within the safety margin of its
//! expiry; otherwise lookups are free. Failures propagate untouched.

use chrono::Duration;
use degreed_domain::constants::TOKEN_SAFETY_MARGIN_SECS;
use degreed_domain::{Credentials, DegreedError, Result, Token};
use tracing::{debug, info};

use crate::ports::{AccessTokenProvider, Clock, SystemClock, TokenEndpoint};

/// Lazily refreshed client-credentials token
///
/// Not shared between runs: each extraction builds its own cache.
pub struct TokenCache<E, C = SystemClock> {
    endpoint: E,
    credentials: Credentials,
    scopes: Vec<String>,
    clock: C,
    margin: Duration,
    current: Option<Token>,
    refreshes: usize,
}

impl<E: TokenEndpoint> TokenCache<E, SystemClock> {
    pub fn new(endpoint: E, credentials: Credentials, scopes: Vec<String>) -> Self {
        Self::with_clock(endpoint, credentials, scopes, SystemClock)
    }
}

impl<E: TokenEndpoint, C: Clock> TokenCache<E, C> {
    pub fn with_clock(endpoint: E, credentials: Credentials, scopes: Vec<String>, clock: C) -> Self {
        Self {
            endpoint,
            credentials,
            scopes,
            clock,
            margin: Duration::seconds(TOKEN_SAFETY_MARGIN_SECS),
            current: None,
            refreshes: 0,
        }
    }

    /// Return the cached token, refreshing first if it is absent or stale.
    ///
    /// # Errors
    /// Whatever the token endpoint reports; a grant with an empty
    /// `access_token` is an `Auth` error.
    pub fn get_valid_token(&mut self) -> Result<Token> {
        let now = self.clock.now();

        if let Some(token) = &self.current {
            if token.is_valid_at(now, self.margin) {
                return Ok(token.clone());
            }
            debug!(expires_at = %token.expires_at, "cached token is stale");
        }

        let grant = self.endpoint.request_token(&self.credentials, &self.scopes)?;
        if grant.access_token.trim().is_empty() {
            return Err(DegreedError::Auth {
                status: None,
                message: "token endpoint returned an empty access_token".into(),
            });
        }

        let token = Token::from_grant(grant, now);
        self.refreshes += 1;
        info!(expires_at = %token.expires_at, refreshes = self.refreshes, "access token refreshed");

        self.current = Some(token.clone());
        Ok(token)
    }

    /// Number of successful token fetches so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Drop the cached token so the next lookup refreshes.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}

impl<E: TokenEndpoint, C: Clock> AccessTokenProvider for TokenCache<E, C> {
    fn access_token(&mut self) -> Result<Token> {
        self.get_valid_token()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::{TimeZone, Utc};
    use degreed_domain::TokenGrant;

    use super::*;
    use crate::testing::ManualClock;

    struct FakeEndpoint {
        expires_in: i64,
        calls: Cell<usize>,
        seen_scopes: RefCell<Vec<String>>,
        fail_with: Option<DegreedError>,
    }

    impl FakeEndpoint {
        fn new(expires_in: i64) -> Self {
            Self { expires_in, calls: Cell::new(0), seen_scopes: RefCell::default(), fail_with: None }
        }
    }

    impl TokenEndpoint for &FakeEndpoint {
        fn request_token(&self, _: &Credentials, scopes: &[String]) -> Result<TokenGrant> {
            self.calls.set(self.calls.get() + 1);
            *self.seen_scopes.borrow_mut() = scopes.to_vec();
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(TokenGrant {
                access_token: format!("token-{}", self.calls.get()),
                token_type: Some("Bearer".into()),
                expires_in: Some(self.expires_in),
                scope: None,
            })
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("id", "secret").unwrap()
    }

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 23, 0, 0, 0).unwrap()
    }

    #[test]
    fn first_call_fetches_and_later_calls_reuse() {
        let endpoint = FakeEndpoint::new(3600);
        let clock = ManualClock::at(start());
        let mut cache =
            TokenCache::with_clock(&endpoint, credentials(), vec!["users:read".into()], clock.clone());

        let first = cache.get_valid_token().unwrap();
        clock.advance(Duration::seconds(10));
        let second = cache.get_valid_token().unwrap();

        assert_eq!(first.access_token, "token-1");
        assert_eq!(second, first);
        assert_eq!(endpoint.calls.get(), 1);
        assert_eq!(endpoint.seen_scopes.borrow().as_slice(), ["users:read".to_string()]);
    }

    #[test]
    fn reuses_until_safety_margin_then_refreshes() {
        let endpoint = FakeEndpoint::new(3600);
        let clock = ManualClock::at(start());
        let mut cache = TokenCache::with_clock(&endpoint, credentials(), vec![], clock.clone());

        cache.get_valid_token().unwrap();

        clock.set(start() + Duration::seconds(3600 - 61));
        assert_eq!(cache.get_valid_token().unwrap().access_token, "token-1");
        assert_eq!(endpoint.calls.get(), 1);

        clock.set(start() + Duration::seconds(3600 - 59));
        assert_eq!(cache.get_valid_token().unwrap().access_token, "token-2");
        assert_eq!(endpoint.calls.get(), 2);
        assert_eq!(cache.refresh_count(), 2);
    }

    #[test]
    fn refresh_failure_propagates_without_retry() {
        let mut endpoint = FakeEndpoint::new(3600);
        endpoint.fail_with = Some(DegreedError::Auth { status: Some(401), message: "nope".into() });
        let mut cache =
            TokenCache::with_clock(&endpoint, credentials(), vec![], ManualClock::at(start()));

        let err = cache.get_valid_token().unwrap_err();
        assert_eq!(err, DegreedError::Auth { status: Some(401), message: "nope".into() });
        assert_eq!(endpoint.calls.get(), 1);
        assert_eq!(cache.refresh_count(), 0);
    }

    #[test]
    fn invalidate_forces_refresh() {
        let endpoint = FakeEndpoint::new(3600);
        let mut cache =
            TokenCache::with_clock(&endpoint, credentials(), vec![], ManualClock::at(start()));

        cache.get_valid_token().unwrap();
        cache.invalidate();
        assert_eq!(cache.access_token().unwrap().access_token, "token-2");
    }

    #[test]
    fn zero_lifetime_token_refreshes_every_call() {
        let endpoint = FakeEndpoint::new(0);
        let mut cache =
            TokenCache::with_clock(&endpoint, credentials(), vec![], ManualClock::at(start()));

        cache.get_valid_token().unwrap();
        cache.get_valid_token().unwrap();
        assert_eq!(endpoint.calls.get(), 2);
    }
}
