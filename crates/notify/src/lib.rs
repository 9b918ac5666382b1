//! Alert delivery for infrawatch.
//!
//! This crate delivers the engine's alert decisions to messaging platforms.
//! A notification's target decides the channel: Slack incoming-webhook URLs
//! get a Slack attachment, SNS topic ARNs are published through the AWS SDK,
//! any other HTTP(S) URL gets a generic JSON payload.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use notify::Notifier;
//!
//! # async fn example(config: aws_config::SdkConfig) {
//! let notifier = Arc::new(
//!     Notifier::from_env().with_channel(Arc::new(notify::SnsChannel::new(&config))),
//! );
//! # }
//! // monitor.with_notifier(notifier)
//! ```
//!
//! # Configuration
//!
//! - `NOTIFY_DISABLED`: Set to "true" to disable all notifications
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for notification channels
//! - [`SlackChannel`] implements Slack webhook notifications
//! - [`SnsChannel`] publishes to Amazon SNS topics
//! - [`WebhookChannel`] posts plain JSON to any endpoint
//! - [`Notifier`] routes each message to the first channel accepting its target
//!   and implements the engine's [`infrawatch_health::Notifier`] trait

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod events;

pub use channels::slack::SlackChannel;
pub use channels::sns::SnsChannel;
pub use channels::webhook::WebhookChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use events::{severity_color, AlertMessage};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use infrawatch_health::{Notification, TransportError};
use tracing::{debug, info, warn};

/// Environment variable to disable all notifications.
const ENV_NOTIFY_DISABLED: &str = "NOTIFY_DISABLED";

/// Central notification dispatcher.
pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
    disabled: bool,
}

impl Notifier {
    /// Create a notifier with the default channels, honouring `NOTIFY_DISABLED`.
    #[must_use]
    pub fn from_env() -> Self {
        let disabled = std::env::var(ENV_NOTIFY_DISABLED)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        if disabled {
            info!("Notifications disabled via NOTIFY_DISABLED");
            return Self::disabled();
        }

        Self::with_default_channels()
    }

    /// Create a notifier with the Slack and generic webhook channels.
    #[must_use]
    pub fn with_default_channels() -> Self {
        Self::with_channels(vec![
            Arc::new(SlackChannel::new()),
            Arc::new(WebhookChannel::new()),
        ])
    }

    /// Create a notifier with specific channels, tried in order.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self {
            channels,
            disabled: false,
        }
    }

    /// Add a channel, tried after the existing ones. A disabled notifier
    /// stays disabled.
    #[must_use]
    pub fn with_channel(mut self, channel: Arc<dyn NotifyChannel>) -> Self {
        if !self.disabled {
            self.channels.push(channel);
        }
        self
    }

    /// Create a disabled notifier (for testing or when notifications are off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            channels: vec![],
            disabled: true,
        }
    }

    /// Check if any notification channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.disabled && !self.channels.is_empty()
    }

    /// Get the number of enabled channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        if self.disabled {
            0
        } else {
            self.channels.len()
        }
    }

    /// Find the channel responsible for a target.
    fn route(&self, target: &str) -> Option<&Arc<dyn NotifyChannel>> {
        self.channels.iter().find(|c| c.accepts(target))
    }

    /// Deliver a message and wait for the channel's answer.
    pub async fn deliver(&self, message: &AlertMessage) -> Result<(), ChannelError> {
        if self.disabled {
            debug!("Notifications disabled, skipping message");
            return Err(ChannelError::Disabled);
        }

        let Some(channel) = self.route(&message.target) else {
            warn!(target_url = %message.target, "No channel accepts notification target");
            return Err(ChannelError::NotConfigured(format!(
                "no channel accepts target {}",
                message.target
            )));
        };

        debug!(channel = channel.name(), subject = %message.subject, "Dispatching notification");
        channel.send(message).await
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl infrawatch_health::Notifier for Notifier {
    async fn publish(&self, notification: &Notification) -> Result<(), TransportError> {
        let message = AlertMessage::from_notification(notification, Utc::now());
        self.deliver(&message).await.map_err(TransportError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrawatch_health::Notifier as _;
    use infrawatch_health::Severity;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_disabled_notifier() {
        let notifier = Notifier::disabled();
        assert!(!notifier.has_channels());
        assert_eq!(notifier.channel_count(), 0);
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(Severity::Info), "#3498db");
        assert_eq!(severity_color(Severity::Warning), "#f39c12");
        assert_eq!(severity_color(Severity::Critical), "#e74c3c");
    }

    #[test]
    fn test_routing_prefers_slack_for_slack_hooks() {
        let notifier = Notifier::with_default_channels();
        assert_eq!(notifier.channel_count(), 2);
        assert_eq!(
            notifier
                .route("https://hooks.slack.com/services/T/B/x")
                .map(|c| c.name()),
            Some("slack")
        );
        assert_eq!(
            notifier.route("https://ops.example.com/hook").map(|c| c.name()),
            Some("webhook")
        );
        assert!(notifier.route("mailto:ops@example.com").is_none());
    }

    #[tokio::test]
    async fn test_publish_unroutable_target_is_transport_error() {
        let notifier = Notifier::with_default_channels();
        let notification = Notification {
            target: "mailto:ops@example.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
            severity: Severity::Warning,
        };
        let err = notifier.publish(&notification).await.unwrap_err();
        assert!(matches!(err, TransportError::Notify(_)));
    }

    #[tokio::test]
    async fn test_publish_delivers_through_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/alerts"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::with_default_channels();
        let notification = Notification {
            target: format!("{}/alerts", server.uri()),
            subject: "Backup Validation Alert - vault".to_string(),
            body: "details".to_string(),
            severity: Severity::Critical,
        };
        assert!(notifier.publish(&notification).await.is_ok());
    }

    #[tokio::test]
    async fn test_sns_targets_route_to_added_channel() {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new("us-east-1"))
            .load()
            .await;
        let notifier = Notifier::with_default_channels().with_channel(Arc::new(SnsChannel::new(&config)));

        assert_eq!(notifier.channel_count(), 3);
        assert_eq!(
            notifier
                .route("arn:aws:sns:us-east-1:123456789012:alerts")
                .map(|c| c.name()),
            Some("sns")
        );
        assert_eq!(
            notifier.route("https://ops.example.com/hook").map(|c| c.name()),
            Some("webhook")
        );
        assert_eq!(Notifier::disabled().with_channel(Arc::new(SnsChannel::new(&config))).channel_count(), 0);
    }

    #[tokio::test]
    async fn test_disabled_notifier_rejects() {
        let message = AlertMessage::new("https://ops.example.com", "s", "b", Severity::Info);
        let err = Notifier::disabled().deliver(&message).await.unwrap_err();
        assert!(matches!(err, ChannelError::Disabled));
    }
}
