//! Error types for the evaluation pipeline.

use thiserror::Error;

/// Configuration problems detected when a [`crate::MonitorConfig`] is validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required option was not supplied
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    /// An option was supplied but could not be used
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures reported by the external collaborators (fetcher, notifier).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The snapshot fetch (or a per-record detail lookup) failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The provider rejected our credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Notification delivery failed
    #[error("Notification failed: {0}")]
    Notify(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Faults that abort an invocation before a health summary exists.
#[derive(Debug, Clone, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
