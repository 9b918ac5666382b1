//! The evaluation pipeline and its error boundary.
//!
//! ```text
//! Monitor::run
//!   ├── MonitorConfig::validate       (ConfigError → 500)
//!   ├── SnapshotFetcher::fetch        (TransportError → 500)
//!   ├── MonitorDomain::evaluate       (per-record faults become ERROR items)
//!   ├── AlertPolicy::decide           (pure)
//!   └── Notifier::publish             (failure logged, status stays 200)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::collaborators::{Notification, Notifier, SnapshotFetcher};
use crate::config::MonitorConfig;
use crate::domain::MonitorDomain;
use crate::envelope::ResultEnvelope;
use crate::error::MonitorError;
use crate::policy::{AlertDecision, AlertPolicy};
use crate::summary::HealthSummary;

/// What happened to the alert after the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "delivery", rename_all = "snake_case")]
pub enum Delivery {
    /// The policy did not fire (or evaluation never completed)
    NotRequired,
    /// The policy fired but dispatch was not attempted
    Skipped { reason: String },
    /// The notifier accepted the message
    Delivered,
    /// The notifier failed; the evaluation result stands
    Failed { error: String },
}

/// Full record of one invocation.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub envelope: ResultEnvelope,
    /// Present when evaluation completed
    pub summary: Option<HealthSummary>,
    /// Present when evaluation completed
    pub decision: Option<AlertDecision>,
    pub delivery: Delivery,
}

/// Runs one domain's fetch → classify → aggregate → decide → notify pipeline.
pub struct Monitor<D: MonitorDomain> {
    config: MonitorConfig,
    domain: D,
    fetcher: Arc<dyn SnapshotFetcher<Record = D::Record>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<D: MonitorDomain> Monitor<D> {
    #[must_use]
    pub fn new(
        config: MonitorConfig,
        domain: D,
        fetcher: Arc<dyn SnapshotFetcher<Record = D::Record>>,
    ) -> Self {
        Self {
            config,
            domain,
            fetcher,
            notifier: None,
        }
    }

    /// Attach the notifier used when the policy fires.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run one invocation against the current time.
    pub async fn run(&self) -> ResultEnvelope {
        self.run_at(Utc::now()).await.envelope
    }

    /// Run one invocation as of `now`. Never fails; every fault ends up in the
    /// returned envelope.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Outcome {
        let kind = self.domain.kind();

        let summary = match self.evaluate(now).await {
            Ok(summary) => summary,
            Err(e) => {
                error!(domain = %kind, error = %e, "Health evaluation failed");
                return Outcome {
                    envelope: ResultEnvelope::failure(
                        kind,
                        &e,
                        self.config.resolved_fields(kind),
                    ),
                    summary: None,
                    decision: None,
                    delivery: Delivery::NotRequired,
                };
            }
        };

        log_completion(&summary);

        let decision = AlertPolicy::new(self.config.thresholds()).decide(&summary);
        let delivery = self.dispatch(&decision).await;

        Outcome {
            envelope: ResultEnvelope::success(&summary),
            summary: Some(summary),
            decision: Some(decision),
            delivery,
        }
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> Result<HealthSummary, MonitorError> {
        let subject = self.config.validate()?;
        let thresholds = self.config.thresholds();

        let request = self.domain.fetch_request(&subject, &thresholds, now);
        debug!(
            domain = %self.domain.kind(),
            resource = %request.resource_id,
            "Fetching snapshot"
        );
        let records = self.fetcher.fetch(&request).await?;

        Ok(self
            .domain
            .evaluate(&subject, records, &thresholds, now)
            .await)
    }

    async fn dispatch(&self, decision: &AlertDecision) -> Delivery {
        if !decision.should_fire {
            debug!("Policy did not fire, no notification");
            return Delivery::NotRequired;
        }

        let Some(target) = self.config.notification_target.as_deref() else {
            info!(
                subject = %decision.subject,
                "No notification target configured, skipping dispatch"
            );
            return Delivery::Skipped {
                reason: "no notification target configured".to_string(),
            };
        };

        let Some(notifier) = &self.notifier else {
            warn!(
                notification_target = target,
                "Notification target configured but no notifier attached"
            );
            return Delivery::Skipped {
                reason: "no notifier attached".to_string(),
            };
        };

        let notification = Notification {
            target: target.to_string(),
            subject: decision.subject.clone(),
            body: decision.body.clone(),
            severity: decision.severity,
        };

        match notifier.publish(&notification).await {
            Ok(()) => {
                info!(
                    notification_target = target,
                    subject = %notification.subject,
                    "Alert notification sent"
                );
                Delivery::Delivered
            }
            Err(e) => {
                error!(
                    notification_target = target,
                    error = %e,
                    "Failed to send alert notification"
                );
                Delivery::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

fn log_completion(summary: &HealthSummary) {
    debug!(
        domain = %summary.kind(),
        resource = summary.resource_id(),
        evaluated_at = %summary.evaluated_at(),
        "Evaluation finished"
    );
    match summary {
        HealthSummary::Backup(s) => info!(
            vault = %s.backup_vault_name,
            total = s.total_recovery_points,
            successful = s.successful_backups,
            failed = s.failed_backups,
            "Backup validation completed"
        ),
        HealthSummary::Certificate(s) => info!(
            certificate = %s.certificate_arn,
            domain = s.domain_name.as_deref().unwrap_or("unknown"),
            days_until_expiry = ?s.days_until_expiry,
            "Certificate monitoring completed"
        ),
    }
}
