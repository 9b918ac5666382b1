//! Slack webhook notification channel.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{check_response, NotifyChannel};
use crate::error::ChannelError;
use crate::events::{severity_color, AlertMessage};

/// Prefix of Slack incoming-webhook URLs.
pub const SLACK_WEBHOOK_PREFIX: &str = "https://hooks.slack.com/";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Slack webhook notification channel.
pub struct SlackChannel {
    prefix: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a channel for `hooks.slack.com` targets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(SLACK_WEBHOOK_PREFIX)
    }

    /// Create a channel for targets starting with `prefix` (Slack-compatible
    /// endpoints such as Mattermost, or a local test server).
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            prefix: prefix.into(),
            client,
        }
    }

    /// Format a message as a Slack webhook payload.
    fn format_payload(message: &AlertMessage) -> SlackPayload {
        let attachment = SlackAttachment {
            fallback: message.subject.clone(),
            color: severity_color(message.severity).to_string(),
            author_name: Some("infrawatch".to_string()),
            title: message.subject.clone(),
            text: format!("```{}```", message.body),
            fields: vec![SlackField {
                title: "Severity".to_string(),
                value: message.severity.as_str().to_string(),
                short: true,
            }],
            footer: Some(format!(
                "{} | {}",
                message.severity.as_str(),
                message.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            ts: Some(message.timestamp.timestamp()),
        };

        SlackPayload {
            attachments: vec![attachment],
        }
    }
}

impl Default for SlackChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn accepts(&self, target: &str) -> bool {
        target.starts_with(&self.prefix)
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), ChannelError> {
        let payload = Self::format_payload(message);

        debug!(channel = "slack", subject = %message.subject, "Sending notification");

        let response = self
            .client
            .post(&message.target)
            .json(&payload)
            .send()
            .await?;

        check_response("slack", response).await?;
        debug!(channel = "slack", "Notification sent successfully");
        Ok(())
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct SlackPayload {
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    fallback: String,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<String>,
    title: String,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<SlackField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ts: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SlackField {
    title: String,
    value: String,
    short: bool,
}
