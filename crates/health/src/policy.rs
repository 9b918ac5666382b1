//! Alert policy: a pure decision from a [`HealthSummary`] to an [`AlertDecision`].
//!
//! The policy never fails. When the summary is inconsistent or lacks the data a
//! decision needs, it fires a generic warning rather than staying silent.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PolicyThresholds;
use crate::summary::{BackupSummary, CertificateSummary, ClassifiedItem, HealthSummary, Verdict};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Severity attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational - nothing to act on
    Info,
    /// Warning - something needs attention
    Warning,
    /// Critical - immediate action required
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Whether to notify, and what to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertDecision {
    pub should_fire: bool,
    pub severity: Severity,
    pub subject: String,
    pub body: String,
}

impl AlertDecision {
    fn fire(severity: Severity, subject: String, body: String) -> Self {
        Self {
            should_fire: true,
            severity,
            subject,
            body,
        }
    }

    fn quiet(subject: String, body: String) -> Self {
        Self {
            should_fire: false,
            severity: Severity::Info,
            subject,
            body,
        }
    }
}

/// Decides whether a summary warrants a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertPolicy {
    thresholds: PolicyThresholds,
}

impl AlertPolicy {
    #[must_use]
    pub const fn new(thresholds: PolicyThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub const fn thresholds(&self) -> PolicyThresholds {
        self.thresholds
    }

    /// Decide for the given summary. Same summary, same decision.
    #[must_use]
    pub fn decide(&self, summary: &HealthSummary) -> AlertDecision {
        match summary {
            HealthSummary::Backup(s) => Self::decide_backup(s),
            HealthSummary::Certificate(s) => self.decide_certificate(s),
        }
    }

    fn decide_backup(summary: &BackupSummary) -> AlertDecision {
        if let Some(reason) = backup_inconsistency(summary) {
            return generic_warning("backup vault", &summary.backup_vault_name, &reason);
        }

        let label = backup_label(summary);

        if summary.failed_backup_details.is_empty() {
            return AlertDecision::quiet(
                format!("Backup Validation OK - {label}"),
                format!(
                    "All {} recovery points in {} completed.",
                    summary.total_recovery_points, summary.backup_vault_name
                ),
            );
        }

        let mut body = String::new();
        let _ = writeln!(body, "Backup Validation Alert - {label}");
        let _ = writeln!(body);
        let _ = writeln!(body, "Backup Vault: {}", summary.backup_vault_name);
        let _ = writeln!(
            body,
            "Validation Time: {}",
            summary.validation_timestamp.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(body);
        let _ = writeln!(body, "Summary:");
        let _ = writeln!(body, "- Total Recovery Points: {}", summary.total_recovery_points);
        let _ = writeln!(body, "- Successful Backups: {}", summary.successful_backups);
        let _ = writeln!(body, "- Failed Backups: {}", summary.failed_backups);
        let _ = writeln!(body);
        let _ = writeln!(body, "Failed Backup Details:");
        for item in &summary.failed_backup_details {
            write_item(&mut body, item);
        }
        let _ = writeln!(body);
        body.push_str("Please investigate and resolve backup issues immediately.");

        AlertDecision::fire(
            Severity::Critical,
            format!("Backup Validation Alert - {label}"),
            body,
        )
    }

    fn decide_certificate(&self, summary: &CertificateSummary) -> AlertDecision {
        let name = summary
            .domain_name
            .as_deref()
            .unwrap_or(&summary.certificate_arn);

        let (Some(days), Some(expiry)) = (summary.days_until_expiry, summary.expiry_date) else {
            return generic_warning(
                "certificate",
                name,
                "the provider reported no expiry date",
            );
        };

        if days > self.thresholds.expiry_warning_days {
            return AlertDecision::quiet(
                format!("SSL Certificate OK - {name}"),
                format!("Certificate for {name} expires in {days} days."),
            );
        }

        let body = certificate_body(summary, name, days, expiry);
        let severity = if days < 0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        AlertDecision::fire(
            severity,
            format!("SSL Certificate Expiry Warning - {name}"),
            body,
        )
    }
}

fn backup_label(summary: &BackupSummary) -> String {
    match (&summary.project_name, &summary.environment) {
        (Some(project), Some(env)) => format!("{project} ({env})"),
        (Some(project), None) => project.clone(),
        (None, Some(env)) => format!("{} ({env})", summary.backup_vault_name),
        (None, None) => summary.backup_vault_name.clone(),
    }
}

fn write_item(body: &mut String, item: &ClassifiedItem) {
    if item.validation_status == Verdict::Missing {
        let _ = writeln!(
            body,
            "- [MISSING] {}",
            item.error.as_deref().unwrap_or("No recovery points observed")
        );
        return;
    }

    let _ = writeln!(body, "- [{}] {}", item.validation_status, item.identifier());
    if let Some(resource) = &item.resource_arn {
        let _ = writeln!(body, "  Resource: {resource}");
    }
    if let Some(status) = &item.status {
        let _ = writeln!(body, "  Status: {status}");
    }
    if let Some(created) = item.creation_date {
        let _ = writeln!(body, "  Created: {}", created.format(TIMESTAMP_FORMAT));
    }
    if let Some(error) = &item.error {
        let _ = writeln!(body, "  Error: {error}");
    }
}

fn certificate_body(
    summary: &CertificateSummary,
    name: &str,
    days: i64,
    expiry: DateTime<Utc>,
) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "SSL Certificate Expiry Warning");
    let _ = writeln!(body);
    let _ = writeln!(body, "Domain: {name}");
    let _ = writeln!(body, "Certificate ARN: {}", summary.certificate_arn);
    let _ = writeln!(body, "Days until expiry: {days}");
    let _ = writeln!(body, "Expiry date: {}", expiry.format(TIMESTAMP_FORMAT));
    let _ = writeln!(
        body,
        "Status: {}",
        summary.status.as_deref().unwrap_or("UNKNOWN")
    );
    let _ = writeln!(body);
    body.push_str("Please renew the certificate before it expires.");
    body
}

/// Returns a description of the first inconsistency found, if any.
fn backup_inconsistency(summary: &BackupSummary) -> Option<String> {
    if summary.failed_backups != summary.failed_backup_details.len() {
        return Some(format!(
            "failed count {} does not match {} listed failures",
            summary.failed_backups,
            summary.failed_backup_details.len()
        ));
    }

    let missing = summary
        .failed_backup_details
        .iter()
        .filter(|i| i.validation_status == Verdict::Missing)
        .count();
    let listed_ok = summary
        .failed_backup_details
        .iter()
        .any(|i| i.validation_status.is_ok());

    if listed_ok {
        return Some("a successful item is listed among failures".to_string());
    }

    if summary.total_recovery_points == 0 {
        let consistent =
            missing == 1 && summary.failed_backups == 1 && summary.successful_backups == 0;
        return (!consistent)
            .then(|| "no recovery points but not exactly one MISSING entry".to_string());
    }

    let evaluated = summary.successful_backups + summary.failed_backups - missing;
    if missing != 0 || evaluated != summary.total_recovery_points {
        return Some(format!(
            "{} recovery points but {} classified",
            summary.total_recovery_points, evaluated
        ));
    }

    None
}

fn generic_warning(kind: &str, name: &str, reason: &str) -> AlertDecision {
    AlertDecision::fire(
        Severity::Warning,
        format!("Health Check Warning - {name}"),
        format!(
            "Health evaluation for {kind} {name} could not reach a verdict: {reason}.\n\n\
             Please inspect the resource manually."
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecoveryPoint, RecoveryPointDetail};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn backup_summary(items: Vec<ClassifiedItem>) -> HealthSummary {
        let subject = crate::config::Subject {
            resource_id: "prod-vault".to_string(),
            project_name: Some("shop".to_string()),
            environment: Some("prod".to_string()),
            domain_name: None,
        };
        crate::aggregate::aggregate_backups(&subject, items, Duration::hours(24), now())
    }

    fn evaluated(arn: &str, status: &str) -> ClassifiedItem {
        let point = RecoveryPoint::new(arn, "arn:aws:rds:db-1", status, now());
        let verdict = crate::classify::backup_verdict(&point);
        ClassifiedItem::evaluated(&point, RecoveryPointDetail::default(), verdict)
    }

    fn certificate_summary(days: Option<i64>) -> HealthSummary {
        HealthSummary::Certificate(CertificateSummary {
            project_name: None,
            environment: None,
            domain_name: Some("example.com".to_string()),
            certificate_arn: "arn:aws:acm:cert/1".to_string(),
            days_until_expiry: days,
            expiry_date: days.map(|d| now() + Duration::days(d)),
            status: Some("ISSUED".to_string()),
            timestamp: now(),
        })
    }

    #[test]
    fn test_healthy_backups_do_not_fire() {
        let summary = backup_summary(vec![evaluated("a", "COMPLETED"), evaluated("b", "COMPLETED")]);
        let decision = AlertPolicy::default().decide(&summary);
        assert!(!decision.should_fire);
        assert_eq!(decision.severity, Severity::Info);
    }

    #[test]
    fn test_failed_backup_enumerated_in_body() {
        let summary = backup_summary(vec![
            evaluated("arn:rp:ok", "COMPLETED"),
            evaluated("arn:rp:bad", "PARTIAL"),
        ]);
        let decision = AlertPolicy::default().decide(&summary);

        assert!(decision.should_fire);
        assert_eq!(decision.severity, Severity::Critical);
        assert_eq!(decision.subject, "Backup Validation Alert - shop (prod)");
        assert!(decision.body.contains("- [FAILED] arn:rp:bad"));
        assert!(decision.body.contains("Status: PARTIAL"));
        assert!(decision.body.contains("Validation Time: 2026-10-19 12:00:00 UTC"));
        assert!(!decision.body.contains("arn:rp:ok"));
    }

    #[test]
    fn test_missing_fires() {
        let decision = AlertPolicy::default().decide(&backup_summary(vec![]));
        assert!(decision.should_fire);
        assert!(decision
            .body
            .contains("- [MISSING] No recovery points observed in the last 24 hours"));
    }

    #[test]
    fn test_inconsistent_summary_fires_generic_warning() {
        let HealthSummary::Backup(mut summary) = backup_summary(vec![evaluated("a", "COMPLETED")])
        else {
            unreachable!()
        };
        summary.total_recovery_points = 5;

        let decision = AlertPolicy::default().decide(&HealthSummary::Backup(summary));
        assert!(decision.should_fire);
        assert_eq!(decision.severity, Severity::Warning);
        assert_eq!(decision.subject, "Health Check Warning - prod-vault");
    }

    #[test]
    fn test_certificate_threshold_is_inclusive() {
        let policy = AlertPolicy::default();
        assert!(policy.decide(&certificate_summary(Some(30))).should_fire);
        assert!(!policy.decide(&certificate_summary(Some(31))).should_fire);
    }

    #[test]
    fn test_certificate_threshold_is_configurable() {
        let policy = AlertPolicy::new(PolicyThresholds {
            expiry_warning_days: 7,
            ..PolicyThresholds::default()
        });
        assert!(!policy.decide(&certificate_summary(Some(8))).should_fire);
        assert!(policy.decide(&certificate_summary(Some(7))).should_fire);
    }

    #[test]
    fn test_expired_certificate_is_critical() {
        let decision = AlertPolicy::default().decide(&certificate_summary(Some(-2)));
        assert!(decision.should_fire);
        assert_eq!(decision.severity, Severity::Critical);
        assert!(decision.body.contains("Days until expiry: -2"));
    }

    #[test]
    fn test_certificate_body_fields() {
        let decision = AlertPolicy::default().decide(&certificate_summary(Some(10)));
        assert_eq!(decision.subject, "SSL Certificate Expiry Warning - example.com");
        assert!(decision.body.contains("Domain: example.com"));
        assert!(decision.body.contains("Certificate ARN: arn:aws:acm:cert/1"));
        assert!(decision.body.contains("Days until expiry: 10"));
        assert!(decision.body.contains("Expiry date: 2026-10-29 12:00:00 UTC"));
        assert!(decision.body.contains("Status: ISSUED"));
    }

    #[test]
    fn test_certificate_without_expiry_fires_generic_warning() {
        let decision = AlertPolicy::default().decide(&certificate_summary(None));
        assert!(decision.should_fire);
        assert_eq!(decision.severity, Severity::Warning);
        assert!(decision.body.contains("no expiry date"));
    }

    #[test]
    fn test_decision_is_deterministic() {
        let summary = backup_summary(vec![evaluated("a", "FAILED"), evaluated("b", "COMPLETED")]);
        let policy = AlertPolicy::default();
        let first = policy.decide(&summary);
        let second = policy.decide(&summary);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
