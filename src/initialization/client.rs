//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_USER_AGENT, HTTP_TIMEOUT};

/// Initializes the HTTP client shared by the snapshot loader and the Slack notifier.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(HTTP_TIMEOUT)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
}
