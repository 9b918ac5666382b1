//! Amazon SNS topic channel.

use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use tracing::{debug, warn};

use super::NotifyChannel;
use crate::error::ChannelError;
use crate::events::AlertMessage;

/// SNS rejects subjects of 100 characters or more.
const MAX_SUBJECT_CHARS: usize = 99;

/// Publishes to SNS topics addressed by `arn:<partition>:sns:...` targets.
pub struct SnsChannel {
    client: aws_sdk_sns::Client,
}

impl SnsChannel {
    /// Build from a loaded AWS configuration, sharing its credentials,
    /// region and endpoint override.
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

/// SNS subjects are a single line below the length limit.
fn sns_subject(subject: &str) -> String {
    subject
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(MAX_SUBJECT_CHARS)
        .collect()
}

#[async_trait]
impl NotifyChannel for SnsChannel {
    fn name(&self) -> &'static str {
        "sns"
    }

    fn accepts(&self, target: &str) -> bool {
        let mut parts = target.split(':');
        parts.next() == Some("arn") && parts.nth(1) == Some("sns")
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), ChannelError> {
        debug!(channel = "sns", topic = %message.target, subject = %message.subject, "Sending notification");

        let output = self
            .client
            .publish()
            .topic_arn(&message.target)
            .subject(sns_subject(&message.subject))
            .message(&message.body)
            .send()
            .await
            .map_err(|err| {
                let body = DisplayErrorContext(&err).to_string();
                warn!(channel = "sns", topic = %message.target, error = %body, "Publish failed");
                match err.raw_response().map(|r| r.status().as_u16()) {
                    Some(status) => ChannelError::Rejected {
                        channel: "sns",
                        status,
                        body,
                    },
                    None => ChannelError::Publish {
                        channel: "sns",
                        message: body,
                    },
                }
            })?;

        debug!(channel = "sns", message_id = output.message_id().unwrap_or_default(), "Published");
        Ok(())
    }
}
