//! Configuration constants.
//!
//! Defaults for the scan orchestration, the Slack API, and the retry
//! strategy used for outbound HTTP calls.

use std::time::Duration;

// Scan orchestration
/// Default number of accounts scanned concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Default wall-clock budget for a single account's scan in seconds.
///
/// An account that does not finish within this budget is reported as a
/// `ScanError` rather than being verified against a partial inventory.
pub const DEFAULT_ACCOUNT_TIMEOUT_SECS: u64 = 300;
/// Default number of items served per page by the snapshot inventory.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Upper bound on pages drained from one listing before giving up.
///
/// A collaborator that keeps handing out continuation tokens is treated as
/// broken; the account fails instead of looping forever.
pub const MAX_PAGES_PER_LISTING: usize = 10_000;

// HTTP
/// Timeout for outbound HTTP requests (snapshot download, Slack API).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("cloud_takeover/", env!("CARGO_PKG_VERSION"));
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 10;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// Slack
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
pub const SLACK_TOKEN_ENV: &str = "SLACK_TOKEN";
pub const SLACK_CHANNEL_ENV: &str = "CHANNEL_ID";
pub const SLACK_DEBUG_CHANNEL_ENV: &str = "CHANNEL_ID_DEBUG";

/// Alert text; `{}` is replaced with the organization label (`aws`, `azure`).
pub const ALERT_NOTIFICATION_TEXT: &str =
    "Attention: Potentially vulnerable resources detected in {}, susceptible to subdomain takeover.";
/// All-clear text; `{}` is replaced with the organization label.
pub const ALL_CLEAR_NOTIFICATION_TEXT: &str = "Everything is under control on the {} org!";

// Logging
/// Environment variable consulted when `--log-level` is not given.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
