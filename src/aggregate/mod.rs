//! Organization-wide scan.
//!
//! Runs the per-account pipeline (candidates, resource keys, verification)
//! for every account and merges the results. An account that fails for any
//! reason becomes a [`ScanError`]; the remaining accounts are still scanned.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::config::{DEFAULT_ACCOUNT_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY};
use crate::error_handling::{ScanError, ScanErrorKind};
use crate::fingerprint::{suffix_rules, SuffixRule};
use crate::inventory::{collect_candidates, collect_resource_keys, DnsInventory, ResourceInventory};
use crate::models::{AccountRef, CloudProvider, Finding, ResourceType};
use crate::utils::{sanitize_error_message, sanitize_for_log};
use crate::verify::verify;

/// Settings shared by every account of one scan.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Suffix rules of the organization's provider
    pub rules: &'static [SuffixRule],
    /// Candidates of these types are dropped before verification
    pub ignored_types: Vec<ResourceType>,
    /// Number of accounts scanned at the same time
    pub max_concurrency: usize,
    /// Wall-clock budget of one account's scan
    pub account_timeout: Duration,
}

impl ScanSettings {
    /// Default settings for `provider`.
    pub fn new(provider: CloudProvider) -> Self {
        Self {
            rules: suffix_rules(provider),
            ignored_types: Vec::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            account_timeout: Duration::from_secs(DEFAULT_ACCOUNT_TIMEOUT_SECS),
        }
    }
}

/// Merged outcome of an organization scan.
#[derive(Debug, Clone, Default)]
pub struct OrgScanResult {
    /// Findings of all accounts, in account order
    pub findings: Vec<Finding>,
    /// One entry per account that could not be scanned
    pub errors: Vec<ScanError>,
    /// Number of accounts attempted
    pub accounts_scanned: usize,
}

impl OrgScanResult {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// `"name - id"` with control characters removed.
fn account_label(account: &AccountRef) -> String {
    sanitize_for_log(&account.to_string())
}

/// Scans a single account.
///
/// The resource key set is fully built before verification; a failure in
/// any listing fails the whole account.
pub async fn scan_account<D, R>(
    dns: &D,
    resources: &R,
    account: &AccountRef,
    settings: &ScanSettings,
) -> Result<Vec<Finding>, ScanError>
where
    D: DnsInventory,
    R: ResourceInventory,
{
    let label = account_label(account);
    debug!("Scanning account {}", label);

    let candidates = collect_candidates(dns, account, settings.rules)
        .await
        .map_err(|e| ScanError::new(account.clone(), ScanErrorKind::classify(&e, true), e))?;

    let candidates = if settings.ignored_types.is_empty() {
        candidates
    } else {
        let before = candidates.len();
        let kept = candidates.retain(|c| !settings.ignored_types.contains(&c.resource_type));
        debug!(
            "Account {}: ignored {} candidates by resource type",
            label,
            before - kept.len()
        );
        kept
    };

    let resource_keys = collect_resource_keys(resources, account)
        .await
        .map_err(|e| ScanError::new(account.clone(), ScanErrorKind::classify(&e, false), e))?;

    let findings = verify(&candidates, &resource_keys);
    if findings.is_empty() {
        info!(
            "Account {}: {} candidates, no dangling records",
            label,
            candidates.len()
        );
    } else {
        info!(
            "Account {}: {} dangling records: {}",
            label,
            findings.len(),
            serde_json::to_string(&findings).unwrap_or_default()
        );
    }
    Ok(findings)
}

/// Scans every account and merges findings and errors.
///
/// Up to `max_concurrency` accounts run at once, each under its own
/// timeout. Results are merged in account order regardless of completion
/// order. Findings are never de-duplicated across accounts.
pub async fn run_org_scan<D, R>(
    dns: &D,
    resources: &R,
    accounts: &[AccountRef],
    settings: &ScanSettings,
) -> OrgScanResult
where
    D: DnsInventory,
    R: ResourceInventory,
{
    let concurrency = settings.max_concurrency.max(1);
    info!(
        "Scanning {} accounts ({} at a time)",
        accounts.len(),
        concurrency
    );

    let outcomes: Vec<Result<Vec<Finding>, ScanError>> = stream::iter(accounts)
        .map(|account| async move {
            match tokio::time::timeout(
                settings.account_timeout,
                scan_account(dns, resources, account, settings),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(ScanError::new(
                    account.clone(),
                    ScanErrorKind::Timeout,
                    format!(
                        "scan did not finish within {}s",
                        settings.account_timeout.as_secs_f64()
                    ),
                )),
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let mut result = OrgScanResult {
        accounts_scanned: accounts.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(findings) => result.findings.extend(findings),
            Err(error) => {
                warn!(
                    "Account {} skipped ({}): {}",
                    account_label(&error.account),
                    error.kind,
                    sanitize_error_message(&error.cause)
                );
                result.errors.push(error);
            }
        }
    }

    info!(
        "Scanned {} accounts: {} findings, {} failed accounts",
        result.accounts_scanned,
        result.findings.len(),
        result.errors.len()
    );
    result
}
