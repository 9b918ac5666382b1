//! AWS Certificate Manager lookups.

use async_trait::async_trait;
use infrawatch_health::{CertificateRecord, FetchRequest, SnapshotFetcher, TransportError};
use tracing::debug;

use super::client::AwsClient;
use super::models::certificate_record;
use crate::providers::error::CloudProviderError;

/// ACM client.
#[derive(Clone, Debug)]
pub struct CertificateClient {
    client: aws_sdk_acm::Client,
}

impl CertificateClient {
    #[must_use]
    pub fn new(aws: &AwsClient) -> Self {
        Self {
            client: aws_sdk_acm::Client::new(aws.sdk_config()),
        }
    }

    /// Describe a certificate by ARN. Returns `None` when the answer carries
    /// no certificate.
    ///
    /// # Errors
    /// Returns error on transport failure or an error answer.
    pub async fn describe_certificate(
        &self,
        certificate_arn: &str,
    ) -> Result<Option<CertificateRecord>, CloudProviderError> {
        let output = self
            .client
            .describe_certificate()
            .certificate_arn(certificate_arn)
            .send()
            .await
            .map_err(|e| CloudProviderError::from_sdk(&e))?;

        let record = output
            .certificate()
            .map(|detail| certificate_record(detail, certificate_arn))
            .transpose()?;
        debug!(
            certificate_arn,
            not_after = ?record.as_ref().and_then(|r| r.not_after),
            "Described certificate"
        );
        Ok(record)
    }
}

#[async_trait]
impl SnapshotFetcher for CertificateClient {
    type Record = CertificateRecord;

    async fn fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<CertificateRecord>, TransportError> {
        let record = self.describe_certificate(&request.resource_id).await?;
        Ok(record.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::aws::client::test_client;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARN: &str = "arn:aws:acm:us-east-1:123456789012:certificate/abc";

    async fn client(server: &MockServer) -> CertificateClient {
        CertificateClient::new(&test_client(&server.uri()).await)
    }

    fn request() -> FetchRequest {
        FetchRequest {
            resource_id: ARN.to_string(),
            window: None,
        }
    }

    #[tokio::test]
    async fn test_describe_certificate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", "CertificateManager.DescribeCertificate"))
            .and(body_partial_json(json!({ "CertificateArn": ARN })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Certificate": {
                    "CertificateArn": ARN,
                    "DomainName": "example.com",
                    "NotAfter": 1_793_426_400,
                    "Status": "ISSUED"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = client(&server).await.fetch(&request()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].domain_name.as_deref(), Some("example.com"));
        assert_eq!(records[0].status.as_deref(), Some("ISSUED"));
        assert_eq!(
            records[0].not_after,
            Some(Utc.with_ymd_and_hms(2026, 10, 31, 6, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_answer_without_certificate_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let records = client(&server).await.fetch(&request()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_certificate_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "ResourceNotFoundException",
                "message": "Could not find certificate"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.fetch(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Fetch(ref m) if m.starts_with("Resource not found")));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "ExpiredTokenException",
                "message": "The security token included in the request is expired"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.fetch(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Auth(_)));
    }
}
