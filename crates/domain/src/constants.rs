//! Application constants
//!
//! Centralized location for the Degreed API defaults used throughout the
//! workspace.

// Upstream locations
pub const DEFAULT_API_BASE_URL: &str = "https://api.degreed.com/api/v2";
pub const DEFAULT_TOKEN_URL: &str = "https://degreed.com/oauth/token";

/// Read scopes covering every supported endpoint, space-separated on the wire.
pub const DEFAULT_SCOPES: &[&str] = &[
    "users:read",
    "logins:read",
    "pathways:read",
    "completions:read",
    "views:read",
    "required-learning:read",
];

// Token lifecycle
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 60;

// Pagination
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_MAX_PAGES: usize = 10_000;

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("degreed-export/", env!("CARGO_PKG_VERSION"));

// Credential names looked up in the secrets provider
pub const CLIENT_ID_KEY: &str = "client_id";
pub const CLIENT_SECRET_KEY: &str = "client_secret";

// Query parameter names
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_FILTER_START_DATE: &str = "filter[start_date]";
pub const PARAM_FILTER_END_DATE: &str = "filter[end_date]";

/// Separator between path segments of a flattened record key.
pub const FLATTEN_SEPARATOR: char = '.';

/// Key used when a record is a bare scalar or sequence rather than an object.
pub const FLATTEN_ROOT_KEY: &str = "value";
