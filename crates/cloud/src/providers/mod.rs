//! Cloud provider adapters.
//!
//! Each adapter implements the engine's fetch traits for one provider.

pub mod aws;
mod error;

pub use error::CloudProviderError;
