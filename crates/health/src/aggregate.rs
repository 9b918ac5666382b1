//! Reduction of classified items into a [`HealthSummary`].

use chrono::{DateTime, Duration, Utc};

use crate::config::Subject;
use crate::summary::{
    BackupSummary, CertificateEvaluation, CertificateSummary, ClassifiedItem, HealthSummary,
    Verdict,
};

/// Message carried by the synthetic MISSING item.
///
/// The window is rendered in the largest whole unit that divides it.
#[must_use]
pub fn missing_message(window: Duration) -> String {
    let secs = window.num_seconds();
    let span = match secs {
        3600 => "hour".to_string(),
        60 => "minute".to_string(),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "second".to_string(),
        s => format!("{s} seconds"),
    };
    format!("No recovery points observed in the last {span}")
}

/// Build the backup summary from one classified item per input record.
///
/// An empty item list produces a single MISSING entry and a total of zero.
#[must_use]
pub fn aggregate_backups(
    subject: &Subject,
    items: Vec<ClassifiedItem>,
    window: Duration,
    now: DateTime<Utc>,
) -> HealthSummary {
    let total = items.len();
    let successful = items.iter().filter(|i| i.validation_status.is_ok()).count();

    let mut failed_backup_details: Vec<ClassifiedItem> = items
        .iter()
        .filter(|i| !i.validation_status.is_ok())
        .cloned()
        .collect();

    if total == 0 {
        failed_backup_details.push(ClassifiedItem::missing(missing_message(window)));
    }

    let validation_results: Vec<ClassifiedItem> = items
        .into_iter()
        .filter(|i| matches!(i.validation_status, Verdict::Ok | Verdict::Failed))
        .collect();

    HealthSummary::Backup(BackupSummary {
        project_name: subject.project_name.clone(),
        environment: subject.environment.clone(),
        backup_vault_name: subject.resource_id.clone(),
        validation_timestamp: now,
        total_recovery_points: total,
        successful_backups: successful,
        failed_backups: failed_backup_details.len(),
        validation_results,
        failed_backup_details,
    })
}

/// Build the certificate summary. There is nothing to count; the evaluation is
/// carried through with the subject's labels.
#[must_use]
pub fn aggregate_certificate(
    subject: &Subject,
    evaluation: CertificateEvaluation,
    now: DateTime<Utc>,
) -> HealthSummary {
    HealthSummary::Certificate(CertificateSummary {
        project_name: subject.project_name.clone(),
        environment: subject.environment.clone(),
        domain_name: subject.domain_name.clone().or(evaluation.domain_name),
        certificate_arn: evaluation.certificate_arn,
        days_until_expiry: evaluation.days_until_expiry,
        expiry_date: evaluation.expiry_date,
        status: evaluation.status,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecoveryPoint, RecoveryPointDetail};
    use chrono::TimeZone;

    fn subject() -> Subject {
        Subject {
            resource_id: "prod-vault".to_string(),
            project_name: Some("shop".to_string()),
            environment: Some("prod".to_string()),
            domain_name: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn item(arn: &str, verdict: Verdict) -> ClassifiedItem {
        let point = RecoveryPoint::new(arn, "arn:res", "COMPLETED", now());
        match verdict {
            Verdict::Error => ClassifiedItem::errored(&point, "boom"),
            _ => ClassifiedItem::evaluated(&point, RecoveryPointDetail::default(), verdict),
        }
    }

    fn backup(summary: HealthSummary) -> BackupSummary {
        match summary {
            HealthSummary::Backup(s) => s,
            HealthSummary::Certificate(_) => panic!("expected backup summary"),
        }
    }

    #[test]
    fn test_empty_input_is_missing() {
        let summary = backup(aggregate_backups(&subject(), vec![], Duration::hours(24), now()));

        assert_eq!(summary.total_recovery_points, 0);
        assert_eq!(summary.successful_backups, 0);
        assert_eq!(summary.failed_backups, 1);
        assert_eq!(summary.failed_backup_details[0].validation_status, Verdict::Missing);
        assert_eq!(
            summary.failed_backup_details[0].error.as_deref(),
            Some("No recovery points observed in the last 24 hours")
        );
        assert!(summary.validation_results.is_empty());
    }

    #[test]
    fn test_counts_and_order() {
        let items = vec![
            item("a", Verdict::Ok),
            item("b", Verdict::Failed),
            item("c", Verdict::Error),
            item("d", Verdict::Ok),
        ];
        let summary = backup(aggregate_backups(&subject(), items, Duration::hours(24), now()));

        assert_eq!(summary.total_recovery_points, 4);
        assert_eq!(summary.successful_backups, 2);
        assert_eq!(summary.failed_backups, 2);
        let failed: Vec<&str> = summary
            .failed_backup_details
            .iter()
            .map(ClassifiedItem::identifier)
            .collect();
        assert_eq!(failed, vec!["b", "c"]);
        let evaluated: Vec<&str> = summary
            .validation_results
            .iter()
            .map(ClassifiedItem::identifier)
            .collect();
        assert_eq!(evaluated, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_certificate_domain_label_falls_back_to_provider() {
        let evaluation = CertificateEvaluation {
            certificate_arn: "arn:acm:1".to_string(),
            domain_name: Some("provider.example.com".to_string()),
            days_until_expiry: Some(40),
            expiry_date: Some(now() + Duration::days(40)),
            status: Some("ISSUED".to_string()),
        };

        let HealthSummary::Certificate(summary) =
            aggregate_certificate(&subject(), evaluation.clone(), now())
        else {
            panic!("expected certificate summary");
        };
        assert_eq!(summary.domain_name.as_deref(), Some("provider.example.com"));
        assert_eq!(summary.certificate_arn, "arn:acm:1");

        let labelled = Subject {
            domain_name: Some("shop.example.com".to_string()),
            ..subject()
        };
        let HealthSummary::Certificate(summary) = aggregate_certificate(&labelled, evaluation, now())
        else {
            panic!("expected certificate summary");
        };
        assert_eq!(summary.domain_name.as_deref(), Some("shop.example.com"));
    }

    #[test]
    fn test_missing_message_singular() {
        assert_eq!(
            missing_message(Duration::hours(1)),
            "No recovery points observed in the last hour"
        );
    }

    #[test]
    fn test_missing_message_units() {
        assert_eq!(
            missing_message(Duration::hours(24)),
            "No recovery points observed in the last 24 hours"
        );
        assert_eq!(
            missing_message(Duration::minutes(30)),
            "No recovery points observed in the last 30 minutes"
        );
        assert_eq!(
            missing_message(Duration::minutes(90)),
            "No recovery points observed in the last 90 minutes"
        );
        assert_eq!(
            missing_message(Duration::seconds(45)),
            "No recovery points observed in the last 45 seconds"
        );
    }
}
