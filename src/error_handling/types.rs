//! Error type definitions.
//!
//! This module defines the error types raised at each collaborator seam and
//! the per-account `ScanError` record the aggregator collects.

use std::fmt;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::models::AccountRef;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure to extract a resource group from an Azure resource ID.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdError {
    /// `resourceGroups` is the last segment.
    #[error("resource group not found in resource ID")]
    MissingResourceGroup,

    /// No `resourceGroups` segment at all.
    #[error("resource group key not found in resource ID")]
    MissingResourceGroupsKey,
}

/// Error types raised by inventory collaborators (DNS and resource listings).
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A paginated listing call failed.
    #[error("failed to list {listing}: {message}")]
    Listing {
        listing: &'static str,
        message: String,
    },

    /// The account's inventory does not match the expected schema.
    #[error("failed to decode inventory for account {account}: {message}")]
    Decode { account: String, message: String },

    /// The collaborator could not act on behalf of the account.
    #[error("account {account} is unavailable: {reason}")]
    Unavailable { account: String, reason: String },

    /// The account is not part of the inventory.
    #[error("account {0} is not present in the inventory")]
    UnknownAccount(String),

    /// A continuation token was not issued by the collaborator.
    #[error("invalid page token {0:?}")]
    InvalidPageToken(String),

    /// A listing kept returning continuation tokens.
    #[error("listing {listing} did not terminate after {pages} pages")]
    RunawayPagination { listing: &'static str, pages: usize },

    /// A resource identifier could not be parsed.
    #[error("invalid resource ID {id:?}: {source}")]
    InvalidResourceId {
        id: String,
        #[source]
        source: ResourceIdError,
    },

    /// The organization snapshot could not be loaded.
    #[error("failed to load snapshot from {location}: {message}")]
    SnapshotLoad { location: String, message: String },
}

/// Error types for notification delivery.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Transport-level failure talking to Slack.
    #[error("Slack request failed: {0}")]
    Http(#[from] ReqwestError),

    /// Slack answered with a non-success HTTP status.
    #[error("Slack API returned HTTP {status}")]
    Status { status: u16 },

    /// Slack answered `{"ok": false}`.
    #[error("Slack API error: {0}")]
    Api(String),

    /// Writing the notification to stdout failed.
    #[error("failed to write notification: {0}")]
    Io(#[from] std::io::Error),
}

impl NotificationError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            NotificationError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            NotificationError::Status { status } => {
                *status == crate::config::HTTP_STATUS_TOO_MANY_REQUESTS || *status >= 500
            }
            NotificationError::Api(code) => code == "ratelimited" || code == "service_unavailable",
            NotificationError::Io(_) => false,
        }
    }
}

/// Which stage of an account's scan failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIterMacro)]
#[serde(rename_all = "kebab-case")]
pub enum ScanErrorKind {
    /// The account could not be accessed (credential or identity failure)
    Credentials,
    /// Listing DNS zones or record sets failed
    DnsListing,
    /// Listing provisioned resources failed
    ResourceListing,
    /// The account's inventory did not match the expected schema
    Decode,
    /// The account did not finish within its time budget
    Timeout,
}

impl ScanErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanErrorKind::Credentials => "Account credentials error",
            ScanErrorKind::DnsListing => "DNS listing error",
            ScanErrorKind::ResourceListing => "Resource listing error",
            ScanErrorKind::Decode => "Inventory decode error",
            ScanErrorKind::Timeout => "Account scan timeout",
        }
    }

    /// Classifies an inventory error raised while listing DNS (`dns_stage`)
    /// or resources.
    pub fn classify(error: &InventoryError, dns_stage: bool) -> Self {
        match error {
            InventoryError::Unavailable { .. } | InventoryError::UnknownAccount(_) => {
                ScanErrorKind::Credentials
            }
            InventoryError::Decode { .. } => ScanErrorKind::Decode,
            _ if dns_stage => ScanErrorKind::DnsListing,
            _ => ScanErrorKind::ResourceListing,
        }
    }
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed account scan. The rest of the organization is still scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub account: AccountRef,
    pub kind: ScanErrorKind,
    pub cause: String,
}

impl ScanError {
    pub fn new(account: AccountRef, kind: ScanErrorKind, cause: impl ToString) -> Self {
        Self {
            account,
            kind,
            cause: cause.to_string(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.account, self.kind, self.cause)
    }
}

impl std::error::Error for ScanError {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_scan_error_kind_as_str_is_unique() {
        let labels: Vec<&str> = ScanErrorKind::iter().map(|k| k.as_str()).collect();
        let mut deduped = labels.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }

    #[test]
    fn test_classify_by_stage() {
        let listing = InventoryError::Listing {
            listing: "buckets",
            message: "throttled".to_string(),
        };
        assert_eq!(
            ScanErrorKind::classify(&listing, true),
            ScanErrorKind::DnsListing
        );
        assert_eq!(
            ScanErrorKind::classify(&listing, false),
            ScanErrorKind::ResourceListing
        );
    }

    #[test]
    fn test_classify_overrides_stage() {
        let unavailable = InventoryError::Unavailable {
            account: "1".to_string(),
            reason: "AccessDenied".to_string(),
        };
        assert_eq!(
            ScanErrorKind::classify(&unavailable, false),
            ScanErrorKind::Credentials
        );

        let decode = InventoryError::Decode {
            account: "1".to_string(),
            message: "missing field `id`".to_string(),
        };
        assert_eq!(ScanErrorKind::classify(&decode, true), ScanErrorKind::Decode);
    }

    #[test]
    fn test_resource_id_error_messages() {
        assert_eq!(
            ResourceIdError::MissingResourceGroup.to_string(),
            "resource group not found in resource ID"
        );
        assert_eq!(
            ResourceIdError::MissingResourceGroupsKey.to_string(),
            "resource group key not found in resource ID"
        );
    }

    #[test]
    fn test_scan_error_display() {
        let error = ScanError::new(
            AccountRef::new("222", "payments"),
            ScanErrorKind::Timeout,
            "gave up after 300s",
        );
        assert_eq!(
            error.to_string(),
            "payments - 222 (Account scan timeout): gave up after 300s"
        );
    }

    #[test]
    fn test_notification_error_transience() {
        assert!(NotificationError::Status { status: 429 }.is_transient());
        assert!(NotificationError::Status { status: 503 }.is_transient());
        assert!(!NotificationError::Status { status: 403 }.is_transient());
        assert!(NotificationError::Api("ratelimited".to_string()).is_transient());
        assert!(!NotificationError::Api("channel_not_found".to_string()).is_transient());
    }
}
