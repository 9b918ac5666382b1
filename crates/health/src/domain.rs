//! Monitoring domains: the strategy plugged into [`crate::Monitor`].
//!
//! A domain knows how to request its records and how to turn them into a
//! [`HealthSummary`]. The pipeline around it is shared.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::aggregate::{aggregate_backups, aggregate_certificate};
use crate::classify::{classify_certificate, classify_recovery_points};
use crate::collaborators::{EvaluationWindow, FetchRequest, RecoveryPointDetails};
use crate::config::{DomainKind, PolicyThresholds, Subject};
use crate::record::{CertificateRecord, RecoveryPoint};
use crate::summary::HealthSummary;

/// Classification and aggregation for one kind of resource.
#[async_trait]
pub trait MonitorDomain: Send + Sync {
    /// Record type this domain consumes.
    type Record: Send + Sync + 'static;

    fn kind(&self) -> DomainKind;

    /// Build the fetch request for this invocation.
    fn fetch_request(
        &self,
        subject: &Subject,
        thresholds: &PolicyThresholds,
        now: DateTime<Utc>,
    ) -> FetchRequest;

    /// Classify and aggregate the fetched records. Never fails: per-record
    /// faults are recorded in the summary.
    async fn evaluate(
        &self,
        subject: &Subject,
        records: Vec<Self::Record>,
        thresholds: &PolicyThresholds,
        now: DateTime<Utc>,
    ) -> HealthSummary;
}

/// Recovery points in a backup vault over the evaluation window.
#[derive(Clone)]
pub struct BackupDomain {
    details: Arc<dyn RecoveryPointDetails>,
}

impl BackupDomain {
    #[must_use]
    pub fn new(details: Arc<dyn RecoveryPointDetails>) -> Self {
        Self { details }
    }
}

#[async_trait]
impl MonitorDomain for BackupDomain {
    type Record = RecoveryPoint;

    fn kind(&self) -> DomainKind {
        DomainKind::Backup
    }

    fn fetch_request(
        &self,
        subject: &Subject,
        thresholds: &PolicyThresholds,
        now: DateTime<Utc>,
    ) -> FetchRequest {
        FetchRequest {
            resource_id: subject.resource_id.clone(),
            window: Some(EvaluationWindow::ending_at(now, thresholds.window)),
        }
    }

    async fn evaluate(
        &self,
        subject: &Subject,
        records: Vec<RecoveryPoint>,
        thresholds: &PolicyThresholds,
        now: DateTime<Utc>,
    ) -> HealthSummary {
        let items =
            classify_recovery_points(self.details.as_ref(), &subject.resource_id, &records).await;
        aggregate_backups(subject, items, thresholds.window, now)
    }
}

/// Expiry of a single certificate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateDomain;

impl CertificateDomain {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MonitorDomain for CertificateDomain {
    type Record = CertificateRecord;

    fn kind(&self) -> DomainKind {
        DomainKind::Certificate
    }

    fn fetch_request(
        &self,
        subject: &Subject,
        _thresholds: &PolicyThresholds,
        _now: DateTime<Utc>,
    ) -> FetchRequest {
        FetchRequest {
            resource_id: subject.resource_id.clone(),
            window: None,
        }
    }

    async fn evaluate(
        &self,
        subject: &Subject,
        records: Vec<CertificateRecord>,
        _thresholds: &PolicyThresholds,
        now: DateTime<Utc>,
    ) -> HealthSummary {
        if records.len() > 1 {
            warn!(
                certificate = %subject.resource_id,
                count = records.len(),
                "Expected one certificate record, evaluating the matching one"
            );
        }

        let record = records
            .iter()
            .find(|r| r.certificate_arn == subject.resource_id)
            .or_else(|| records.first())
            .cloned()
            .unwrap_or_else(|| {
                warn!(certificate = %subject.resource_id, "No certificate record returned");
                CertificateRecord {
                    certificate_arn: subject.resource_id.clone(),
                    domain_name: None,
                    not_after: None,
                    status: None,
                }
            });

        aggregate_certificate(subject, classify_certificate(&record, now), now)
    }
}
