//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_ACCOUNT_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY, DEFAULT_PAGE_SIZE,
    DEFAULT_SLACK_API_URL, LOG_LEVEL_ENV, SLACK_CHANNEL_ENV, SLACK_DEBUG_CHANNEL_ENV,
    SLACK_TOKEN_ENV,
};
use crate::models::{CloudProvider, ResourceType};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl LogLevel {
    /// Parses a `LOG_LEVEL` style value.
    ///
    /// Accepts `debug`, `info`, `warn`/`warning` and `error` in any case.
    /// Anything else (including an empty string) falls back to `Info`.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    /// Reads the level from the `LOG_LEVEL` environment variable.
    pub fn from_env() -> Self {
        Self::from_env_value(&std::env::var(LOG_LEVEL_ENV).unwrap_or_default())
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Exit code policy.
///
/// A run that completed and delivered its notification exits 0 unless the
/// selected policy trips, in which case it exits 2.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 after a delivered notification
    Never,
    /// Exit 2 when at least one dangling record was found
    Findings,
    /// Exit 2 on findings or when any account failed to scan
    AnyError,
}

/// Slack delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackSettings {
    /// Base URL of the Slack Web API (overridable for testing)
    pub api_url: String,
    /// Bot token used as bearer credential
    pub token: String,
    /// Channel receiving takeover alerts
    pub channel: String,
    /// Channel receiving the all-clear message; falls back to `channel`
    pub debug_channel: Option<String>,
}

impl SlackSettings {
    /// Builds settings from a variable lookup (normally the process environment).
    ///
    /// Returns `None` unless both the token and the alert channel are set
    /// and non-empty.
    pub fn from_lookup<F>(api_url: &str, lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let token = non_empty(SLACK_TOKEN_ENV)?;
        let channel = non_empty(SLACK_CHANNEL_ENV)?;
        Some(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            channel,
            debug_channel: non_empty(SLACK_DEBUG_CHANNEL_ENV),
        })
    }

    /// Builds settings from the process environment.
    pub fn from_env(api_url: &str) -> Option<Self> {
        Self::from_lookup(api_url, |key| std::env::var(key).ok())
    }

    /// Channel for the all-clear message.
    pub fn all_clear_channel(&self) -> &str {
        self.debug_channel.as_deref().unwrap_or(&self.channel)
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Scan an exported AWS organization snapshot
/// cloud_takeover ./aws-org.json
///
/// # Azure snapshot served over HTTP, JSON logs, fail the job on findings
/// cloud_takeover https://inventory.internal/azure.json --log-format json --fail-on findings
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "cloud_takeover",
    about = "Finds DNS aliases pointing at cloud resources that no longer exist."
)]
pub struct Opt {
    /// Organization inventory snapshot (local path or http(s) URL)
    #[arg(value_parser)]
    pub snapshot: String,

    /// Cloud provider of the snapshot (defaults to the one declared in the snapshot)
    #[arg(long, value_enum)]
    pub provider: Option<CloudProvider>,

    /// Log level: error|warn|info|debug|trace (falls back to LOG_LEVEL, then info)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Number of accounts scanned concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-account scan timeout in seconds
    #[arg(long, default_value_t = DEFAULT_ACCOUNT_TIMEOUT_SECS)]
    pub account_timeout_seconds: u64,

    /// Items per page when draining snapshot listings
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Resource type to leave out of verification (repeatable), e.g. `cloud-app`
    #[arg(long = "ignore-type")]
    pub ignored_types: Vec<ResourceType>,

    /// Exit code policy: never|findings|any-error
    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,

    /// Slack Web API base URL
    #[arg(long, default_value = DEFAULT_SLACK_API_URL)]
    pub slack_api_url: String,
}

impl Opt {
    /// Resolves CLI options plus environment into a library [`Config`].
    pub fn into_config(self) -> Config {
        let slack = SlackSettings::from_env(&self.slack_api_url);
        Config {
            snapshot: self.snapshot,
            provider: self.provider,
            log_level: self.log_level.unwrap_or_else(LogLevel::from_env),
            log_format: self.log_format,
            max_concurrency: self.max_concurrency,
            account_timeout_seconds: self.account_timeout_seconds,
            page_size: self.page_size,
            ignored_types: self.ignored_types,
            fail_on: self.fail_on,
            slack,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use cloud_takeover::Config;
///
/// let config = Config {
///     snapshot: "aws-org.json".to_string(),
///     max_concurrency: 8,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot location (local path or http(s) URL)
    pub snapshot: String,

    /// Provider override; `None` uses the provider declared in the snapshot
    pub provider: Option<CloudProvider>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Number of accounts scanned concurrently
    pub max_concurrency: usize,

    /// Per-account scan timeout in seconds
    pub account_timeout_seconds: u64,

    /// Items per page when draining snapshot listings
    pub page_size: usize,

    /// Resource types excluded from verification
    pub ignored_types: Vec<ResourceType>,

    /// Exit code policy
    pub fail_on: FailOn,

    /// Slack delivery; `None` prints the notification to stdout instead
    pub slack: Option<SlackSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot: "snapshot.json".to_string(),
            provider: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            account_timeout_seconds: DEFAULT_ACCOUNT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            ignored_types: Vec::new(),
            fail_on: FailOn::Never,
            slack: None,
        }
    }
}
