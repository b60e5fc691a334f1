//! Scan result notification.
//!
//! This module provides:
//! - `NotificationPayload` - What a scan hands to the notifier
//! - `Notifier` - Delivery seam, with Slack and stdout implementations
//!
//! A scan with findings posts an alert carrying the finding list; a clean
//! scan posts an all-clear message.

mod slack;

use std::future::Future;

use tokio::io::AsyncWriteExt;

use crate::config::{ALERT_NOTIFICATION_TEXT, ALL_CLEAR_NOTIFICATION_TEXT};
use crate::error_handling::NotificationError;
use crate::models::{CloudProvider, Finding};

pub use slack::SlackNotifier;

/// Outcome of a scan, as handed to a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub provider: CloudProvider,
    pub findings: Vec<Finding>,
}

impl NotificationPayload {
    pub fn new(provider: CloudProvider, findings: Vec<Finding>) -> Self {
        Self { provider, findings }
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// One `"• name -> target"` line per finding.
    pub fn bullet_list(&self) -> String {
        self.findings
            .iter()
            .map(|f| format!("• {}", f.summary()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn alert_text(&self) -> String {
        ALERT_NOTIFICATION_TEXT.replace("{}", self.provider.org_label())
    }

    pub fn all_clear_text(&self) -> String {
        ALL_CLEAR_NOTIFICATION_TEXT.replace("{}", self.provider.org_label())
    }

    /// Plain-text rendering: the alert followed by the list, or the all-clear line.
    pub fn render(&self) -> String {
        if self.has_findings() {
            format!("{}\n{}", self.alert_text(), self.bullet_list())
        } else {
            self.all_clear_text()
        }
    }
}

/// Delivers a [`NotificationPayload`].
///
/// A delivery failure is reported to the caller; the scan cannot tell a
/// clean organization from an undelivered alert otherwise.
pub trait Notifier {
    fn notify(
        &self,
        payload: &NotificationPayload,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Prints notifications to stdout. Used when Slack is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}\n", payload.render()).as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}
