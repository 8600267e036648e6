//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use degreed_domain::DegreedError;
use reqwest::Error as HttpError;
use tempfile::PersistError;
use thiserror::Error;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub DegreedError);

impl From<InfraError> for DegreedError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DegreedError> for InfraError {
    fn from(value: DegreedError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDegreedError {
    fn into_degreed(self) -> DegreedError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DegreedError */
/* -------------------------------------------------------------------------- */

impl IntoDegreedError for HttpError {
    fn into_degreed(self) -> DegreedError {
        if self.is_timeout() {
            return DegreedError::TransientNetwork(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return DegreedError::TransientNetwork(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return DegreedError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return DegreedError::Decode(self.to_string());
        }

        if let Some(status) = self.status() {
            return DegreedError::Upstream {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        // request/body/redirect failures: the connection broke mid-exchange
        DegreedError::TransientNetwork(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_degreed())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / tempfile::PersistError → DegreedError */
/* -------------------------------------------------------------------------- */

impl IntoDegreedError for IoError {
    fn into_degreed(self) -> DegreedError {
        DegreedError::Sink(format!("{:?}: {self}", self.kind()))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_degreed())
    }
}

impl From<PersistError> for InfraError {
    fn from(value: PersistError) -> Self {
        InfraError(DegreedError::Sink(format!("atomic rename failed: {}", value.error)))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use reqwest::StatusCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn refused_connection_is_transient() {
        let client = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
        let error = client.get("http://127.0.0.1:1/").send().unwrap_err();

        let mapped: DegreedError = InfraError::from(error).into();
        assert!(mapped.is_retryable(), "expected transient error, got {mapped:?}");
    }

    #[test]
    fn malformed_url_is_config_error() {
        let client = reqwest::blocking::Client::new();
        let error = client.get("not a url").send().unwrap_err();

        let mapped: DegreedError = InfraError::from(error).into();
        assert!(matches!(mapped, DegreedError::Config(_)), "got {mapped:?}");
    }

    #[test]
    fn io_error_maps_to_sink() {
        let err = IoError::new(ErrorKind::PermissionDenied, "read-only filesystem");
        let mapped: DegreedError = InfraError::from(err).into();
        match mapped {
            DegreedError::Sink(msg) => assert!(msg.contains("read-only")),
            other => panic!("expected sink error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn http_status_error_maps_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
            .mount(&server)
            .await;
        let uri = server.uri();

        let mapped = tokio::task::spawn_blocking(move || {
            let client = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
            let error = client.get(uri).send().unwrap().error_for_status().unwrap_err();
            DegreedError::from(InfraError::from(error))
        })
        .await
        .unwrap();

        match mapped {
            DegreedError::Upstream { status, .. } => assert_eq!(status, 503),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
