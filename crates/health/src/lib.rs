//! Resource-health evaluation and alert-decision engine.
//!
//! Turns a provider snapshot of backup recovery points or a TLS certificate
//! into a classified health summary, decides whether an alert must fire, and
//! wraps the whole invocation in a single error boundary that always returns a
//! [`ResultEnvelope`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infrawatch_health::{BackupDomain, Monitor, MonitorConfig};
//!
//! let config = MonitorConfig::from_env();
//! let monitor = Monitor::new(config, BackupDomain::new(details), fetcher)
//!     .with_notifier(notifier);
//!
//! let envelope = monitor.run().await;
//! println!("{}", serde_json::to_string(&envelope)?);
//! ```
//!
//! # Architecture
//!
//! - [`SnapshotFetcher`], [`RecoveryPointDetails`] and [`Notifier`] are the
//!   injected collaborators
//! - [`MonitorDomain`] is the per-domain strategy ([`BackupDomain`],
//!   [`CertificateDomain`]) combining the classifier and aggregator
//! - [`AlertPolicy`] is the pure decision function
//! - [`Monitor`] runs the pipeline and builds the [`ResultEnvelope`]
//!
//! Each invocation is stateless: nothing is carried between runs.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod classify;
pub mod collaborators;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod monitor;
pub mod policy;
pub mod record;
pub mod summary;

pub use collaborators::{
    EvaluationWindow, FetchRequest, Notification, Notifier, RecoveryPointDetails, SnapshotFetcher,
};
pub use config::{DomainKind, MonitorConfig, PolicyThresholds, Subject};
pub use domain::{BackupDomain, CertificateDomain, MonitorDomain};
pub use envelope::{ResultEnvelope, STATUS_FAILED, STATUS_OK};
pub use error::{ConfigError, MonitorError, TransportError};
pub use monitor::{Delivery, Monitor, Outcome};
pub use policy::{AlertDecision, AlertPolicy, Severity};
pub use record::{CertificateRecord, RecoveryPoint, RecoveryPointDetail, STATUS_COMPLETED};
pub use summary::{
    BackupSummary, CertificateEvaluation, CertificateSummary, ClassifiedItem, HealthSummary,
    Verdict,
};
