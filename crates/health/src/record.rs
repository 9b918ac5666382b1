//! Raw resource-state records as reported by a provider.
//!
//! Records are produced by a [`crate::SnapshotFetcher`] and never mutated by
//! the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider status of a recovery point that finished successfully.
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// A backup recovery point observed in a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPoint {
    /// Identifier of the recovery point
    pub recovery_point_arn: String,
    /// Identifier of the resource that was backed up
    pub resource_arn: String,
    /// Provider status (`COMPLETED`, `PARTIAL`, `EXPIRED`, ...)
    pub status: String,
    /// When the recovery point was created
    pub creation_date: DateTime<Utc>,
}

impl RecoveryPoint {
    #[must_use]
    pub fn new(
        recovery_point_arn: impl Into<String>,
        resource_arn: impl Into<String>,
        status: impl Into<String>,
        creation_date: DateTime<Utc>,
    ) -> Self {
        Self {
            recovery_point_arn: recovery_point_arn.into(),
            resource_arn: resource_arn.into(),
            status: status.into(),
            creation_date,
        }
    }

    /// Whether the provider reports this recovery point as complete.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// Supplementary detail fetched per recovery point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPointDetail {
    pub backup_size_bytes: u64,
    pub is_encrypted: bool,
}

/// A TLS certificate as reported by the certificate manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub certificate_arn: String,
    /// Primary domain name on the certificate
    pub domain_name: Option<String>,
    /// Expiry timestamp; absent when the provider has not issued the certificate
    pub not_after: Option<DateTime<Utc>>,
    /// Provider status (`ISSUED`, `PENDING_VALIDATION`, `EXPIRED`, ...)
    pub status: Option<String>,
}
