//! Error types for the notification system.

use infrawatch_health::TransportError;
use thiserror::Error;

/// Errors that can occur when sending notifications.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No channel is configured for the target
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rate limited by the service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The endpoint answered with a non-success status
    #[error("{channel} returned {status}: {body}")]
    Rejected {
        channel: &'static str,
        status: u16,
        body: String,
    },

    /// The publish call never got an answer from the service
    #[error("{channel} publish failed: {message}")]
    Publish {
        channel: &'static str,
        message: String,
    },

    /// Notifications are switched off
    #[error("Notifications disabled")]
    Disabled,
}

impl From<ChannelError> for TransportError {
    fn from(err: ChannelError) -> Self {
        Self::Notify(err.to_string())
    }
}
