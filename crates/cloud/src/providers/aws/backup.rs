//! AWS Backup recovery point listing.

use async_trait::async_trait;
use infrawatch_health::{
    FetchRequest, RecoveryPoint, RecoveryPointDetail, RecoveryPointDetails, SnapshotFetcher,
    TransportError,
};
use tracing::{debug, info};

use super::client::AwsClient;
use super::models::{recovery_point, recovery_point_detail, to_aws};
use crate::providers::error::CloudProviderError;

/// Upper bound on pages fetched for one listing.
const MAX_PAGES: usize = 100;

/// AWS Backup client.
#[derive(Clone, Debug)]
pub struct BackupClient {
    client: aws_sdk_backup::Client,
}

impl BackupClient {
    #[must_use]
    pub fn new(aws: &AwsClient) -> Self {
        Self {
            client: aws_sdk_backup::Client::new(aws.sdk_config()),
        }
    }

    /// List every recovery point in the request's vault and window,
    /// following `NextToken` until the last page.
    ///
    /// # Errors
    /// Returns error on transport failure, an error answer, or a recovery
    /// point missing its ARN or creation date.
    pub async fn list_recovery_points(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<RecoveryPoint>, CloudProviderError> {
        let mut points = Vec::new();
        let mut next_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let mut call = self
                .client
                .list_recovery_points_by_backup_vault()
                .backup_vault_name(&request.resource_id)
                .set_next_token(next_token.take());
            if let Some(window) = &request.window {
                call = call
                    .by_created_after(to_aws(window.start))
                    .by_created_before(to_aws(window.end));
            }

            let output = call
                .send()
                .await
                .map_err(|e| CloudProviderError::from_sdk(&e))?;

            debug!(
                vault = %request.resource_id,
                page,
                count = output.recovery_points().len(),
                "Fetched recovery point page"
            );
            for rp in output.recovery_points() {
                points.push(recovery_point(rp)?);
            }

            match output.next_token().filter(|t| !t.is_empty()) {
                Some(token) => next_token = Some(token.to_string()),
                None => {
                    info!(vault = %request.resource_id, total = points.len(), "Listed recovery points");
                    return Ok(points);
                }
            }
        }

        Err(CloudProviderError::Pagination(MAX_PAGES))
    }

    /// Describe one recovery point.
    ///
    /// # Errors
    /// Returns error on transport failure or an error answer.
    pub async fn describe(
        &self,
        vault: &str,
        recovery_point_arn: &str,
    ) -> Result<RecoveryPointDetail, CloudProviderError> {
        let output = self
            .client
            .describe_recovery_point()
            .backup_vault_name(vault)
            .recovery_point_arn(recovery_point_arn)
            .send()
            .await
            .map_err(|e| CloudProviderError::from_sdk(&e))?;
        Ok(recovery_point_detail(&output))
    }
}

#[async_trait]
impl SnapshotFetcher for BackupClient {
    type Record = RecoveryPoint;

    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RecoveryPoint>, TransportError> {
        Ok(self.list_recovery_points(request).await?)
    }
}

#[async_trait]
impl RecoveryPointDetails for BackupClient {
    async fn describe_recovery_point(
        &self,
        vault: &str,
        recovery_point_arn: &str,
    ) -> Result<RecoveryPointDetail, TransportError> {
        Ok(self.describe(vault, recovery_point_arn).await?)
    }
}
