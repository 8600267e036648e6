//! `degreed-extract`: run one Degreed extraction and land it as JSON lines.
//!
//! Exit codes: `0` success (including "no records"), `75` for failures the
//! scheduler may retry (transient network), `1` for everything else.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use degreed_domain::{DegreedError, ObjectLocation, QueryWindow};
use degreed_infra::{config, run_extraction, EnvSecretProvider, ExtractionJob, JsonLinesSink};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const EXIT_TEMPFAIL: u8 = 75;

/// Extract one Degreed endpoint for a time window
#[derive(Parser, Debug)]
#[command(name = "degreed-extract", version)]
#[command(about = "Pull every page of a Degreed endpoint and write it as JSON lines")]
struct Args {
    /// Endpoint name (users, logins, completions, views, required-learning, pathways)
    #[arg(short, long)]
    endpoint: String,

    /// Window start (RFC 3339 or YYYY-MM-DD); required for logins
    #[arg(long, value_parser = parse_bound)]
    start_at: Option<DateTime<Utc>>,

    /// Window end (RFC 3339 or YYYY-MM-DD); required for logins
    #[arg(long, value_parser = parse_bound)]
    end_at: Option<DateTime<Utc>>,

    /// Destination bucket (defaults to sink.bucket)
    #[arg(long)]
    bucket: Option<String>,

    /// Destination key; derived from --run-ts when omitted
    #[arg(long)]
    key: Option<String>,

    /// Logical run timestamp used in the derived key (defaults to now)
    #[arg(long, value_parser = parse_bound)]
    run_ts: Option<DateTime<Utc>>,

    /// Config file (.json or .toml); probed when omitted
    #[arg(short, long, env = "DEGREED_CONFIG")]
    config: Option<PathBuf>,

    /// Local directory standing in for object storage
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    // A missing .env is normal outside development
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(args.log_json);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let retryable =
                err.downcast_ref::<DegreedError>().is_some_and(DegreedError::is_retryable);
            error!(error = %format!("{err:#}"), retryable, "extraction failed");
            if retryable {
                ExitCode::from(EXIT_TEMPFAIL)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load(args.config.clone())?;
    if let Some(root) = args.output_root {
        config.sink.output_root = root;
    }
    if let Some(bucket) = args.bucket {
        config.sink.bucket = bucket;
    }

    let window = match (args.start_at, args.end_at) {
        (Some(start_at), Some(end_at)) => QueryWindow::between(start_at, end_at)?,
        (start_at, end_at) => QueryWindow { start_at, end_at },
    };

    let mut job = ExtractionJob::new(args.endpoint, window, args.run_ts.unwrap_or_else(Utc::now));
    if let Some(key) = args.key {
        job = job.with_location(ObjectLocation::new(config.sink.bucket.clone(), key)?);
    }

    let secrets = EnvSecretProvider::from_config(&config.secrets);
    let mut sink = JsonLinesSink::from_config(&config.sink);

    let report = run_extraction(&config, &secrets, &mut sink, &job)?;
    info!(
        endpoint = %report.endpoint,
        rows = report.rows_written,
        pages = report.pages_fetched,
        "run finished"
    );

    print_report(&serde_json::to_string(&report).context("failed to encode run report")?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_report(report: &str) {
    println!("{report}");
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the report; logs go to stderr
    if json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).init();
    }
}

/// Accept RFC 3339 timestamps or plain dates (midnight UTC).
fn parse_bound(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{raw}' is neither an RFC 3339 timestamp nor YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_dates_and_timestamps() {
        let midnight = Utc.with_ymd_and_hms(2021, 6, 23, 0, 0, 0).unwrap();
        assert_eq!(parse_bound("2021-06-23").unwrap(), midnight);
        assert_eq!(parse_bound("2021-06-23T00:00:00Z").unwrap(), midnight);
        assert_eq!(
            parse_bound("2021-06-23T02:00:00+02:00").unwrap(),
            midnight
        );
        assert!(parse_bound("yesterday").is_err());
    }

    #[test]
    fn parses_full_invocation() {
        let args = Args::try_parse_from([
            "degreed-extract",
            "--endpoint",
            "logins",
            "--start-at",
            "2021-06-23",
            "--end-at",
            "2021-06-24",
            "--bucket",
            "landing",
            "--log-json",
        ])
        .unwrap();

        assert_eq!(args.endpoint, "logins");
        assert_eq!(args.bucket.as_deref(), Some("landing"));
        assert!(args.log_json);
        assert!(args.key.is_none());
    }
}
