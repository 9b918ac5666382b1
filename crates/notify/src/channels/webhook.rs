//! Generic JSON webhook channel.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use infrawatch_health::Severity;
use serde::Serialize;
use tracing::debug;

use super::{check_response, NotifyChannel};
use crate::error::ChannelError;
use crate::events::AlertMessage;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Posts `{subject, message, severity, timestamp}` to any HTTP(S) endpoint.
pub struct WebhookChannel {
    client: reqwest::Client,
}

impl WebhookChannel {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for WebhookChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    subject: &'a str,
    message: &'a str,
    severity: Severity,
    timestamp: DateTime<Utc>,
}

#[async_trait]
impl NotifyChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn accepts(&self, target: &str) -> bool {
        target.starts_with("https://") || target.starts_with("http://")
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), ChannelError> {
        let payload = WebhookPayload {
            subject: &message.subject,
            message: &message.body,
            severity: message.severity,
            timestamp: message.timestamp,
        };

        debug!(channel = "webhook", subject = %message.subject, "Sending notification");

        let response = self
            .client
            .post(&message.target)
            .json(&payload)
            .send()
            .await?;

        check_response("webhook", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_accepts_http_targets() {
        let channel = WebhookChannel::new();
        assert!(channel.accepts("https://alerts.example.com/hook"));
        assert!(channel.accepts("http://localhost:8080/hook"));
        assert!(!channel.accepts("arn:aws:sns:us-east-1:123456789012:alerts"));
    }

    #[tokio::test]
    async fn test_send_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(json!({
                "subject": "SSL Certificate Expiry Warning - example.com",
                "severity": "warning"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let message = AlertMessage::new(
            format!("{}/hook", server.uri()),
            "SSL Certificate Expiry Warning - example.com",
            "Days until expiry: 12",
            Severity::Warning,
        );
        assert!(WebhookChannel::new().send(&message).await.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
            .mount(&server)
            .await;

        let message = AlertMessage::new(server.uri(), "s", "b", Severity::Info);
        let err = WebhookChannel::new().send(&message).await.unwrap_err();
        assert!(matches!(
            err,
            ChannelError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }
}
