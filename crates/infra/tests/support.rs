//! Shared fixtures for infra integration tests.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use degreed_domain::{ExtractorConfig, QueryWindow};
use degreed_infra::StaticSecretProvider;
use tempfile::TempDir;

/// Configuration pointing every URL at `server_uri`, writing under a
/// temporary directory that lives as long as the fixture.
pub struct TestEnvironment {
    pub config: ExtractorConfig,
    pub output: TempDir,
}

impl TestEnvironment {
    pub fn new(server_uri: &str) -> Self {
        let output = tempfile::tempdir().expect("temp dir should be created");

        let mut config = ExtractorConfig::default();
        config.api.base_url = server_uri.to_string();
        config.api.token_url = format!("{server_uri}/oauth/token");
        config.api.timeout_secs = 5;
        config.sink.output_root = output.path().to_path_buf();
        config.sink.schema = "raw".to_string();

        Self { config, output }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.output.path().join(bucket).join(key)
    }
}

pub fn secrets() -> StaticSecretProvider {
    StaticSecretProvider::new().with("client_id", "client-1").with("client_secret", "s3cret")
}

pub fn login_window() -> QueryWindow {
    QueryWindow::between(
        Utc.with_ymd_and_hms(2021, 6, 23, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2021, 6, 24, 0, 0, 0).unwrap(),
    )
    .expect("valid window")
}

pub fn run_ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 24, 0, 0, 0).unwrap()
}
