//! AWS (Amazon Web Services) adapters.
//!
//! ## Services
//!
//! - **Backup** - recovery points of a backup vault, with per-point details
//! - **ACM** (Certificate Manager) - certificate expiry lookups
//!
//! All service clients share one [`AwsClient`] configuration, so they sign
//! with the same credentials and honour the same endpoint override.

mod acm;
mod backup;
mod client;
mod models;

pub use acm::CertificateClient;
pub use backup::BackupClient;
pub use client::{AwsClient, DEFAULT_REGION};
