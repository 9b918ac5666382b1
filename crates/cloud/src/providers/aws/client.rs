//! Shared AWS SDK configuration.
//!
//! Credentials come from the SDK's default provider chain (environment,
//! shared profile, web identity, container or instance metadata), and every
//! request is signed with SigV4 by the service clients built from it.

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use url::Url;

use crate::providers::error::CloudProviderError;

/// Default timeout for one API operation.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Loaded AWS configuration shared by the service clients.
#[derive(Clone, Debug)]
pub struct AwsClient {
    config: SdkConfig,
}

impl AwsClient {
    /// Load configuration for `region`, optionally sending every request to
    /// `endpoint` instead of the regional AWS endpoint.
    ///
    /// # Errors
    /// Returns error if `endpoint` is not an absolute HTTP(S) URL.
    pub async fn load(
        region: impl Into<String>,
        endpoint: Option<&str>,
    ) -> Result<Self, CloudProviderError> {
        let mut loader = loader(region);
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(validate_endpoint(endpoint)?);
        }
        Ok(Self::from_sdk_config(loader.load().await))
    }

    /// Wrap an already loaded configuration. It must carry a behavior version.
    #[must_use]
    pub fn from_sdk_config(config: SdkConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }

    /// The underlying SDK configuration, for building other service clients.
    #[must_use]
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }
}

/// Base loader: no retries, bounded operation time.
fn loader(region: impl Into<String>) -> ConfigLoader {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.into()))
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build(),
        )
}

fn validate_endpoint(endpoint: &str) -> Result<String, CloudProviderError> {
    let url = Url::parse(endpoint)?;
    match url.scheme() {
        "http" | "https" => Ok(endpoint.trim_end_matches('/').to_string()),
        other => Err(CloudProviderError::Config(format!(
            "endpoint scheme must be http or https, got {other}"
        ))),
    }
}

/// Client with static credentials pointed at a local mock server.
#[cfg(test)]
pub(crate) async fn test_client(endpoint: &str) -> AwsClient {
    let config = loader(DEFAULT_REGION)
        .credentials_provider(aws_credential_types::Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            None,
            None,
            "test",
        ))
        .endpoint_url(endpoint)
        .load()
        .await;
    AwsClient::from_sdk_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_endpoint_override() {
        let client = AwsClient::load("eu-central-1", Some("http://localhost:4566/"))
            .await
            .unwrap();
        assert_eq!(client.region(), Some("eu-central-1"));
        assert_eq!(
            client.sdk_config().endpoint_url(),
            Some("http://localhost:4566")
        );
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_config_error() {
        let err = AwsClient::load(DEFAULT_REGION, Some("not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudProviderError::Config(_)));

        let err = AwsClient::load(DEFAULT_REGION, Some("ftp://proxy.internal"))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudProviderError::Config(ref m) if m.contains("ftp")));
    }
}
