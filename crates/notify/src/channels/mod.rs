//! Notification channel implementations.

pub mod slack;
pub mod sns;
pub mod webhook;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::events::AlertMessage;

/// Trait for notification channels (Slack, SNS, generic webhooks).
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Check if this channel can deliver to the given target.
    fn accepts(&self, target: &str) -> bool;

    /// Send a message to this channel.
    async fn send(&self, message: &AlertMessage) -> Result<(), ChannelError>;
}

/// Turn a non-success response into a [`ChannelError`].
pub(crate) async fn check_response(
    channel: &'static str,
    response: reqwest::Response,
) -> Result<(), ChannelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        return Err(ChannelError::RateLimited { retry_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(
        channel,
        status = %status,
        body = %body,
        "Webhook request failed"
    );

    Err(ChannelError::Rejected {
        channel,
        status: status.as_u16(),
        body,
    })
}
