//! cloud_takeover library: dangling DNS alias detection for cloud organizations
//!
//! This library scans every account (or subscription) of an AWS or Azure
//! organization, matches the alias records of its DNS zones against the
//! resources the account still provisions, and reports the records whose
//! target no longer exists: names an attacker could claim.
//!
//! # Example
//!
//! ```no_run
//! use cloud_takeover::{Config, run_scan};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     snapshot: "aws-org.json".to_string(),
//!     max_concurrency: 8,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!("{} dangling records across {} accounts ({} failed)",
//!          report.findings.len(), report.accounts_scanned, report.errors.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod aggregate;
mod app;
pub mod config;
pub mod error_handling;
pub mod fingerprint;
pub mod initialization;
pub mod inventory;
pub mod models;
pub mod notify;
mod utils;
pub mod verify;

// Re-export public API
pub use config::{Config, FailOn, LogFormat, LogLevel, Opt};
pub use models::{AccountRef, CloudProvider, Finding, ResourceType};
pub use run::{evaluate_exit_code, run_scan, run_scan_with, ScanReport};

// Internal run module (contains the scan orchestration)
mod run {
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use log::{info, warn};

    use crate::aggregate::{run_org_scan, ScanSettings};
    use crate::app::{print_error_statistics, print_finding_statistics, print_simple_summary};
    use crate::config::{Config, FailOn};
    use crate::error_handling::ScanError;
    use crate::fingerprint::suffix_rules;
    use crate::initialization::init_client;
    use crate::inventory::{AccountDirectory, DnsInventory, ResourceInventory, SnapshotInventory};
    use crate::models::{CloudProvider, Finding};
    use crate::notify::{NotificationPayload, Notifier, SlackNotifier, StdoutNotifier};

    /// Results of an organization scan.
    #[derive(Debug, Clone)]
    pub struct ScanReport {
        /// Provider whose suffix rules were applied
        pub provider: CloudProvider,
        /// Number of accounts the organization listed
        pub accounts_scanned: usize,
        /// Dangling records, in account order
        pub findings: Vec<Finding>,
        /// Accounts that could not be scanned
        pub errors: Vec<ScanError>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl ScanReport {
        /// Whether any dangling record was found.
        pub fn has_findings(&self) -> bool {
            !self.findings.is_empty()
        }

        /// Whether any account failed to scan.
        pub fn has_errors(&self) -> bool {
            !self.errors.is_empty()
        }
    }

    /// Runs a scan of the organization snapshot named by `config`.
    ///
    /// The notification goes to Slack when `config.slack` is set, otherwise
    /// to stdout.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The snapshot cannot be loaded or its envelope is malformed
    /// - The account list cannot be obtained
    /// - The notification cannot be delivered
    ///
    /// A failure of an individual account is not an error; it is recorded in
    /// [`ScanReport::errors`].
    pub async fn run_scan(config: Config) -> Result<ScanReport> {
        let client = init_client().context("Failed to initialize HTTP client")?;
        let inventory = SnapshotInventory::load(&config.snapshot, &client, config.page_size)
            .await
            .context("Failed to load organization snapshot")?;

        let provider = match config.provider {
            Some(requested) if requested != inventory.provider() => {
                warn!(
                    "Snapshot declares provider {} but {} was requested; using {}",
                    inventory.provider(),
                    requested,
                    requested
                );
                requested
            }
            Some(requested) => requested,
            None => inventory.provider(),
        };

        match &config.slack {
            Some(settings) => {
                let notifier = SlackNotifier::new(client.clone(), settings.clone());
                run_scan_with(
                    &config, provider, &inventory, &inventory, &inventory, &notifier,
                )
                .await
            }
            None => {
                info!("Slack is not configured; the notification is printed to stdout");
                run_scan_with(
                    &config,
                    provider,
                    &inventory,
                    &inventory,
                    &inventory,
                    &StdoutNotifier,
                )
                .await
            }
        }
    }

    /// Runs a scan against the given collaborators.
    ///
    /// Only account enumeration and notification delivery can fail the run.
    pub async fn run_scan_with<A, D, R, N>(
        config: &Config,
        provider: CloudProvider,
        directory: &A,
        dns: &D,
        resources: &R,
        notifier: &N,
    ) -> Result<ScanReport>
    where
        A: AccountDirectory,
        D: DnsInventory,
        R: ResourceInventory,
        N: Notifier,
    {
        let start_time = Instant::now();

        let accounts = directory
            .list_accounts()
            .await
            .context("Failed to list organization accounts")?;
        info!(
            "Found {} accounts in the {} organization",
            accounts.len(),
            provider
        );

        let settings = ScanSettings {
            rules: suffix_rules(provider),
            ignored_types: config.ignored_types.clone(),
            max_concurrency: config.max_concurrency,
            account_timeout: Duration::from_secs(config.account_timeout_seconds),
        };
        let result = run_org_scan(dns, resources, &accounts, &settings).await;

        print_finding_statistics(&result.findings);
        print_error_statistics(&result.errors);

        let payload = NotificationPayload::new(provider, result.findings);
        notifier
            .notify(&payload)
            .await
            .context("Failed to deliver scan notification")?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        print_simple_summary(
            result.accounts_scanned,
            payload.findings.len(),
            result.errors.len(),
            elapsed_seconds,
        );

        Ok(ScanReport {
            provider,
            accounts_scanned: result.accounts_scanned,
            findings: payload.findings,
            errors: result.errors,
            elapsed_seconds,
        })
    }

    /// Exit code of a completed run under the given policy.
    ///
    /// `0` unless the policy trips, in which case `2`.
    pub fn evaluate_exit_code(fail_on: &FailOn, report: &ScanReport) -> i32 {
        let tripped = match fail_on {
            FailOn::Never => false,
            FailOn::Findings => report.has_findings(),
            FailOn::AnyError => report.has_findings() || report.has_errors(),
        };
        if tripped {
            2
        } else {
            0
        }
    }
}
