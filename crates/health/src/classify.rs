//! Per-record classification.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::collaborators::RecoveryPointDetails;
use crate::record::{CertificateRecord, RecoveryPoint};
use crate::summary::{CertificateEvaluation, ClassifiedItem, Verdict};

/// Health predicate for a recovery point.
#[must_use]
pub fn backup_verdict(point: &RecoveryPoint) -> Verdict {
    if point.is_completed() {
        Verdict::Ok
    } else {
        Verdict::Failed
    }
}

/// Classify one recovery point, looking up its supplementary detail.
///
/// A failed lookup yields an [`Verdict::Error`] item instead of an error.
pub async fn classify_recovery_point(
    details: &dyn RecoveryPointDetails,
    vault: &str,
    point: &RecoveryPoint,
) -> ClassifiedItem {
    match details
        .describe_recovery_point(vault, &point.recovery_point_arn)
        .await
    {
        Ok(detail) => {
            let verdict = backup_verdict(point);
            debug!(
                recovery_point = %point.recovery_point_arn,
                status = %point.status,
                verdict = %verdict,
                "Classified recovery point"
            );
            ClassifiedItem::evaluated(point, detail, verdict)
        }
        Err(e) => {
            warn!(
                recovery_point = %point.recovery_point_arn,
                error = %e,
                "Error validating recovery point"
            );
            ClassifiedItem::errored(point, e.to_string())
        }
    }
}

/// Classify every recovery point. Lookups run concurrently; the result keeps
/// input order.
pub async fn classify_recovery_points(
    details: &dyn RecoveryPointDetails,
    vault: &str,
    points: &[RecoveryPoint],
) -> Vec<ClassifiedItem> {
    join_all(
        points
            .iter()
            .map(|point| classify_recovery_point(details, vault, point)),
    )
    .await
}

/// Whole days from `now` until `expiry`, rounded toward negative infinity.
///
/// An expiry 29 days and 23 hours away is 29 days; one second in the past is -1.
#[must_use]
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = expiry - now;
    let days = remaining.num_days();
    if remaining < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Derive the expiry fields for a certificate.
#[must_use]
pub fn classify_certificate(record: &CertificateRecord, now: DateTime<Utc>) -> CertificateEvaluation {
    let days_until_expiry = record.not_after.map(|expiry| days_until(expiry, now));

    if days_until_expiry.is_none() {
        warn!(
            certificate = %record.certificate_arn,
            "Certificate expiry date not reported"
        );
    }

    CertificateEvaluation {
        certificate_arn: record.certificate_arn.clone(),
        domain_name: record.domain_name.clone(),
        days_until_expiry,
        expiry_date: record.not_after,
        status: record.status.clone(),
    }
}
