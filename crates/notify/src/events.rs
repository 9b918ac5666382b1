//! Alert message delivered by the channels.

use chrono::{DateTime, Utc};
use infrawatch_health::{Notification, Severity};
use serde::Serialize;

/// A message on its way to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    /// Webhook URL or other channel address
    pub target: String,
    pub subject: String,
    pub body: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

impl AlertMessage {
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            target: target.into(),
            subject: subject.into(),
            body: body.into(),
            severity,
            timestamp: Utc::now(),
        }
    }

    /// Build a message from an engine notification, stamped with `timestamp`.
    #[must_use]
    pub fn from_notification(notification: &Notification, timestamp: DateTime<Utc>) -> Self {
        Self {
            target: notification.target.clone(),
            subject: notification.subject.clone(),
            body: notification.body.clone(),
            severity: notification.severity,
            timestamp,
        }
    }
}

/// Attachment color for a severity.
#[must_use]
pub const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "#3498db",     // Blue
        Severity::Warning => "#f39c12",  // Orange
        Severity::Critical => "#e74c3c", // Red
    }
}
