//! Error handling.
//!
//! This module provides:
//! - Error types for each collaborator seam (initialization, inventory, notification)
//! - The per-account `ScanError` record and its `ScanErrorKind` classification
//! - The retry strategy used for outbound HTTP calls
//!
//! Errors are scoped as follows:
//! - **Account-level**: inventory failures become a `ScanError`; other accounts continue
//! - **Terminal**: account enumeration or notification delivery failures end the run

mod types;

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

// Re-export public API
pub use types::{
    InitializationError, InventoryError, NotificationError, ResourceIdError, ScanError,
    ScanErrorKind,
};

/// Retry strategy for outbound HTTP calls.
///
/// Exponential backoff starting at `RETRY_INITIAL_DELAY_MS`, capped at
/// `RETRY_MAX_DELAY_SECS`, for at most `RETRY_MAX_ATTEMPTS` retries.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}
