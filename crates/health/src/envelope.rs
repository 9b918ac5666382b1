//! Uniform result envelope returned by every invocation.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::DomainKind;
use crate::error::MonitorError;
use crate::summary::HealthSummary;

/// Status code for a completed evaluation, whatever its alert outcome.
pub const STATUS_OK: u16 = 200;
/// Status code for an invocation that failed before producing a summary.
pub const STATUS_FAILED: u16 = 500;

/// `{statusCode, body}` handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

impl ResultEnvelope {
    /// Envelope for a completed evaluation.
    #[must_use]
    pub fn success(summary: &HealthSummary) -> Self {
        match serde_json::to_value(summary) {
            Ok(body) => Self {
                status_code: STATUS_OK,
                body,
            },
            Err(e) => Self::error_body(
                format!("Failed to serialize health summary: {e}"),
                Map::new(),
            ),
        }
    }

    /// Envelope for a pipeline fault.
    ///
    /// `resolved` carries the configuration fields known at the time of failure;
    /// nothing else is added.
    #[must_use]
    pub fn failure(kind: DomainKind, error: &MonitorError, resolved: Map<String, Value>) -> Self {
        let message = match kind {
            DomainKind::Backup => format!("Error during backup validation: {error}"),
            DomainKind::Certificate => format!("Error monitoring certificate: {error}"),
        };
        Self::error_body(message, resolved)
    }

    fn error_body(message: String, mut fields: Map<String, Value>) -> Self {
        fields.insert("error".to_string(), Value::String(message));
        Self {
            status_code: STATUS_FAILED,
            body: Value::Object(fields),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// The `error` message of a failed envelope.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}
