//! Interfaces to the external collaborators the engine calls.
//!
//! Concrete clients are injected through these traits so the pipeline can be
//! driven by fakes in tests. Each call is treated as one atomic
//! request/response step; timeouts and retries belong to the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::TransportError;
use crate::policy::Severity;
use crate::record::RecoveryPointDetail;

/// Time range records are fetched over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EvaluationWindow {
    /// Window of `length` ending at `end`. The start saturates at the
    /// earliest representable instant.
    #[must_use]
    pub fn ending_at(end: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: end
                .checked_sub_signed(length)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end,
        }
    }
}

/// Request handed to a [`SnapshotFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Vault name or certificate ARN
    pub resource_id: String,
    /// Creation-time window, for domains that have one
    pub window: Option<EvaluationWindow>,
}

/// Returns the resource-state records for one evaluation.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Record type produced for this domain.
    type Record: Send + Sync;

    /// Fetch the records for the request, in provider order.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Self::Record>, TransportError>;
}

/// Supplementary per-record lookup for backup recovery points.
#[async_trait]
pub trait RecoveryPointDetails: Send + Sync {
    async fn describe_recovery_point(
        &self,
        vault: &str,
        recovery_point_arn: &str,
    ) -> Result<RecoveryPointDetail, TransportError>;
}

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub target: String,
    pub subject: String,
    pub body: String,
    pub severity: Severity,
}

/// Delivers alert messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<(), TransportError>;
}
