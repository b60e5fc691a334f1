//! Slack Web API notifier.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio_retry::RetryIf;

use super::{NotificationPayload, Notifier};
use crate::config::{SlackSettings, RETRY_MAX_ATTEMPTS};
use crate::error_handling::{get_retry_strategy, NotificationError};

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    channel: &'a str,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    warning: Option<String>,
}

/// Posts notifications through `chat.postMessage`.
///
/// Alerts go to the alert channel with the finding list as an attachment;
/// all-clear messages go to the debug channel when one is configured.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    settings: SlackSettings,
    max_retries: usize,
}

impl SlackNotifier {
    pub fn new(client: reqwest::Client, settings: SlackSettings) -> Self {
        Self {
            client,
            settings,
            max_retries: RETRY_MAX_ATTEMPTS,
        }
    }

    /// Caps the retries of a transient failure (`0` disables retrying).
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn post_message(&self, message: &SlackMessage<'_>) -> Result<(), NotificationError> {
        let url = format!("{}/chat.postMessage", self.settings.api_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.token)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Status {
                status: status.as_u16(),
            });
        }

        let body: SlackResponse = response.json().await?;
        if !body.ok {
            return Err(NotificationError::Api(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }
        if let Some(warning) = body.warning {
            debug!("Slack accepted the message with a warning: {}", warning);
        }
        Ok(())
    }

    async fn send(&self, message: &SlackMessage<'_>) -> Result<(), NotificationError> {
        RetryIf::start(
            get_retry_strategy().take(self.max_retries),
            || self.post_message(message),
            |e: &NotificationError| {
                let transient = e.is_transient();
                if transient {
                    debug!("Retrying Slack delivery after transient error: {}", e);
                }
                transient
            },
        )
        .await
    }
}

impl Notifier for SlackNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
        let message = if payload.has_findings() {
            SlackMessage {
                channel: &self.settings.channel,
                text: payload.alert_text(),
                attachments: vec![SlackAttachment {
                    text: payload.bullet_list(),
                }],
            }
        } else {
            SlackMessage {
                channel: self.settings.all_clear_channel(),
                text: payload.all_clear_text(),
                attachments: Vec::new(),
            }
        };

        self.send(&message).await?;
        info!(
            "Notification sent to Slack channel {} ({} findings)",
            message.channel,
            payload.findings.len()
        );
        Ok(())
    }
}
