//! Classified items and the per-invocation health summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DomainKind;
use crate::record::{RecoveryPoint, RecoveryPointDetail};

/// Classification outcome for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Record satisfies the domain's health predicate
    #[serde(rename = "SUCCESS")]
    Ok,
    /// Record is present but violates the predicate
    #[serde(rename = "FAILED")]
    Failed,
    /// Evaluating the record itself raised a fault
    #[serde(rename = "ERROR")]
    Error,
    /// Nothing was observed in the evaluation window
    #[serde(rename = "MISSING")]
    Missing,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
            Self::Missing => "MISSING",
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified backup record (or the synthetic MISSING item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_point_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub validation_status: Verdict,
}

impl ClassifiedItem {
    /// Item for a record whose detail lookup succeeded.
    #[must_use]
    pub fn evaluated(point: &RecoveryPoint, detail: RecoveryPointDetail, verdict: Verdict) -> Self {
        Self {
            recovery_point_arn: Some(point.recovery_point_arn.clone()),
            resource_arn: Some(point.resource_arn.clone()),
            status: Some(point.status.clone()),
            creation_date: Some(point.creation_date),
            backup_size_bytes: Some(detail.backup_size_bytes),
            is_encrypted: Some(detail.is_encrypted),
            error: None,
            validation_status: verdict,
        }
    }

    /// Item for a record that could not be evaluated.
    #[must_use]
    pub fn errored(point: &RecoveryPoint, error: impl Into<String>) -> Self {
        Self {
            recovery_point_arn: Some(point.recovery_point_arn.clone()),
            resource_arn: Some(point.resource_arn.clone()),
            status: Some(point.status.clone()),
            creation_date: Some(point.creation_date),
            backup_size_bytes: None,
            is_encrypted: None,
            error: Some(error.into()),
            validation_status: Verdict::Error,
        }
    }

    /// Synthetic item standing for an empty evaluation window.
    #[must_use]
    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            recovery_point_arn: None,
            resource_arn: None,
            status: None,
            creation_date: None,
            backup_size_bytes: None,
            is_encrypted: None,
            error: Some(message.into()),
            validation_status: Verdict::Missing,
        }
    }

    /// Identifier used in logs and alert bodies.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.recovery_point_arn.as_deref().unwrap_or("(none)")
    }
}

/// Classifier output for the certificate domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateEvaluation {
    pub certificate_arn: String,
    pub domain_name: Option<String>,
    /// Whole days until expiry, floored; absent when no expiry was reported
    pub days_until_expiry: Option<i64>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Aggregated result for a backup vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupSummary {
    pub project_name: Option<String>,
    pub environment: Option<String>,
    pub backup_vault_name: String,
    pub validation_timestamp: DateTime<Utc>,
    pub total_recovery_points: usize,
    pub successful_backups: usize,
    /// Length of `failed_backup_details`
    pub failed_backups: usize,
    /// Every record whose detail lookup succeeded, in input order
    pub validation_results: Vec<ClassifiedItem>,
    /// Every non-OK item, in input order
    pub failed_backup_details: Vec<ClassifiedItem>,
}

/// Evaluation result for a single certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSummary {
    pub project_name: Option<String>,
    pub environment: Option<String>,
    pub domain_name: Option<String>,
    pub certificate_arn: String,
    pub days_until_expiry: Option<i64>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Health summary for one invocation, uniform across domains.
///
/// Serializes untagged so the response body mirrors the domain summary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HealthSummary {
    Backup(BackupSummary),
    Certificate(CertificateSummary),
}

impl HealthSummary {
    #[must_use]
    pub const fn kind(&self) -> DomainKind {
        match self {
            Self::Backup(_) => DomainKind::Backup,
            Self::Certificate(_) => DomainKind::Certificate,
        }
    }

    /// Vault name or certificate ARN.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        match self {
            Self::Backup(s) => &s.backup_vault_name,
            Self::Certificate(s) => &s.certificate_arn,
        }
    }

    /// When the evaluation was performed.
    #[must_use]
    pub const fn evaluated_at(&self) -> DateTime<Utc> {
        match self {
            Self::Backup(s) => s.validation_timestamp,
            Self::Certificate(s) => s.timestamp,
        }
    }
}
