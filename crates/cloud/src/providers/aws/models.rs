//! Conversions from AWS SDK shapes to engine records.

use aws_sdk_acm::types::CertificateDetail;
use aws_sdk_backup::operation::describe_recovery_point::DescribeRecoveryPointOutput;
use aws_sdk_backup::types::RecoveryPointByBackupVault;
use aws_smithy_types::DateTime as AwsDateTime;
use chrono::{DateTime, Utc};
use infrawatch_health::{CertificateRecord, RecoveryPoint, RecoveryPointDetail};

use crate::providers::error::CloudProviderError;

/// Status used when the service omits one.
const UNKNOWN_STATUS: &str = "UNKNOWN";

pub(crate) fn to_utc(ts: &AwsDateTime) -> Result<DateTime<Utc>, CloudProviderError> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
        .ok_or_else(|| CloudProviderError::InvalidResponse(format!("timestamp {ts} out of range")))
}

pub(crate) fn to_aws(ts: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_secs_and_nanos(ts.timestamp(), ts.timestamp_subsec_nanos())
}

/// Convert a listed recovery point.
///
/// # Errors
/// Returns error when the ARN or creation date is absent.
pub(crate) fn recovery_point(rp: &RecoveryPointByBackupVault) -> Result<RecoveryPoint, CloudProviderError> {
    let arn = rp.recovery_point_arn().ok_or_else(|| {
        CloudProviderError::InvalidResponse("recovery point without RecoveryPointArn".to_string())
    })?;
    let created = rp.creation_date().ok_or_else(|| {
        CloudProviderError::InvalidResponse(format!("recovery point {arn} without CreationDate"))
    })?;

    Ok(RecoveryPoint {
        recovery_point_arn: arn.to_string(),
        resource_arn: rp.resource_arn().unwrap_or_default().to_string(),
        status: rp
            .status()
            .map_or(UNKNOWN_STATUS, |s| s.as_str())
            .to_string(),
        creation_date: to_utc(created)?,
    })
}

/// Size and encryption of a described recovery point.
#[must_use]
pub(crate) fn recovery_point_detail(output: &DescribeRecoveryPointOutput) -> RecoveryPointDetail {
    RecoveryPointDetail {
        backup_size_bytes: output
            .backup_size_in_bytes()
            .and_then(|b| u64::try_from(b).ok())
            .unwrap_or(0),
        is_encrypted: output.is_encrypted(),
    }
}

/// Convert an ACM certificate description. `requested_arn` fills in an
/// absent ARN.
///
/// # Errors
/// Returns error when `NotAfter` is out of range.
pub(crate) fn certificate_record(
    detail: &CertificateDetail,
    requested_arn: &str,
) -> Result<CertificateRecord, CloudProviderError> {
    Ok(CertificateRecord {
        certificate_arn: detail
            .certificate_arn()
            .unwrap_or(requested_arn)
            .to_string(),
        domain_name: detail.domain_name().map(str::to_string),
        not_after: detail.not_after().map(to_utc).transpose()?,
        status: detail.status().map(|s| s.as_str().to_string()),
    })
}
