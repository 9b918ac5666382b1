//! Cloud provider integrations for infrawatch.
//!
//! Implements the engine's [`SnapshotFetcher`](infrawatch_health::SnapshotFetcher)
//! and [`RecoveryPointDetails`](infrawatch_health::RecoveryPointDetails)
//! traits on top of the AWS SDK:
//!
//! - **AWS Backup** - [`aws::BackupClient`]
//! - **AWS Certificate Manager** - [`aws::CertificateClient`]
//!
//! Provider errors convert into [`infrawatch_health::TransportError`], so a
//! failed call surfaces as a 500 envelope from the monitor.

#![warn(clippy::pedantic)]

pub mod providers;

pub use providers::aws::{AwsClient, BackupClient, CertificateClient};
pub use providers::{aws, CloudProviderError};
