//! Invocation configuration.
//!
//! Every recognized option lives on [`MonitorConfig`]. The struct is built once
//! (from flags, the environment, or directly in tests) and validated once at the
//! start of [`crate::Monitor::run`]; nothing downstream reads the environment.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Environment variable holding the vault name or certificate ARN.
pub const ENV_RESOURCE_ID: &str = "MONITOR_RESOURCE_ID";
/// Environment variable holding the project label.
pub const ENV_PROJECT_NAME: &str = "PROJECT_NAME";
/// Environment variable holding the environment label.
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
/// Environment variable holding the certificate's domain label.
pub const ENV_DOMAIN_NAME: &str = "DOMAIN_NAME";
/// Environment variable holding the notification target.
pub const ENV_NOTIFICATION_TARGET: &str = "NOTIFICATION_TARGET";
/// Environment variable overriding the backup evaluation window.
pub const ENV_WINDOW_HOURS: &str = "BACKUP_WINDOW_HOURS";
/// Environment variable overriding the certificate warning threshold.
pub const ENV_EXPIRY_WARNING_DAYS: &str = "EXPIRY_WARNING_DAYS";

/// Default backup evaluation window.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;
/// Default certificate warning threshold (inclusive).
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;
/// Longest accepted backup window (100 years).
pub const MAX_WINDOW_HOURS: i64 = 24 * 365 * 100;

/// Which monitoring domain an invocation evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// Backup recovery points in a vault
    Backup,
    /// A single TLS certificate
    Certificate,
}

impl DomainKind {
    /// Name of the body field that carries the resource identifier.
    #[must_use]
    pub const fn resource_field(self) -> &'static str {
        match self {
            Self::Backup => "backup_vault_name",
            Self::Certificate => "certificate_arn",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Certificate => "certificate",
        }
    }
}

impl std::fmt::Display for DomainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options recognized by one invocation.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Vault name (backup) or certificate ARN (certificate). Required.
    pub resource_id: Option<String>,
    /// Project label, passed through to summaries and messages.
    pub project_name: Option<String>,
    /// Environment label, passed through to summaries and messages.
    pub environment: Option<String>,
    /// Certificate domain label; falls back to the provider-reported domain.
    pub domain_name: Option<String>,
    /// Where to deliver alerts. Dispatch is skipped when absent.
    pub notification_target: Option<String>,
    /// How far back recovery points are fetched.
    pub window: Duration,
    /// Certificates expiring within this many days fire.
    pub expiry_warning_days: i64,
    /// A value from the environment that failed to parse, reported on validation.
    rejected: Option<ConfigError>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            resource_id: None,
            project_name: None,
            environment: None,
            domain_name: None,
            notification_target: None,
            window: Duration::hours(DEFAULT_WINDOW_HOURS),
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
            rejected: None,
        }
    }
}

impl MonitorConfig {
    /// Create a configuration for the given vault name or certificate ARN.
    #[must_use]
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            ..Self::default()
        }
    }

    /// Read the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset. Unparseable numeric values are kept aside and
    /// reported by [`MonitorConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            resource_id: get(ENV_RESOURCE_ID),
            project_name: get(ENV_PROJECT_NAME),
            environment: get(ENV_ENVIRONMENT),
            domain_name: get(ENV_DOMAIN_NAME),
            notification_target: get(ENV_NOTIFICATION_TARGET),
            ..Self::default()
        };

        if let Some(raw) = get(ENV_WINDOW_HOURS) {
            match raw.trim().parse::<i64>() {
                Ok(hours) => match Duration::try_hours(hours) {
                    Some(window) => config.window = window,
                    None => {
                        config.rejected = Some(ConfigError::Invalid {
                            field: ENV_WINDOW_HOURS,
                            reason: format!("{hours} hours is out of range"),
                        });
                    }
                },
                Err(e) => {
                    config.rejected = Some(ConfigError::Invalid {
                        field: ENV_WINDOW_HOURS,
                        reason: format!("{raw:?} is not a whole number of hours ({e})"),
                    });
                }
            }
        }

        if let Some(raw) = get(ENV_EXPIRY_WARNING_DAYS) {
            match raw.trim().parse::<i64>() {
                Ok(days) => config.expiry_warning_days = days,
                Err(e) => {
                    config.rejected.get_or_insert(ConfigError::Invalid {
                        field: ENV_EXPIRY_WARNING_DAYS,
                        reason: format!("{raw:?} is not a whole number of days ({e})"),
                    });
                }
            }
        }

        config
    }

    #[must_use]
    pub fn with_project(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    #[must_use]
    pub fn with_domain_name(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    #[must_use]
    pub fn with_notification_target(mut self, target: impl Into<String>) -> Self {
        self.notification_target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_expiry_warning_days(mut self, days: i64) -> Self {
        self.expiry_warning_days = days;
        self
    }

    /// Check every option and resolve the subject being evaluated.
    pub fn validate(&self) -> Result<Subject, ConfigError> {
        if let Some(rejected) = &self.rejected {
            return Err(rejected.clone());
        }

        let resource_id = self
            .resource_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::Missing("resource_id"))?;

        if self.window <= Duration::zero() {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!("must be positive, got {}h", self.window.num_hours()),
            });
        }

        if self.window > Duration::hours(MAX_WINDOW_HOURS) {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!(
                    "must be at most {MAX_WINDOW_HOURS}h, got {}h",
                    self.window.num_hours()
                ),
            });
        }

        if self.expiry_warning_days < 0 {
            return Err(ConfigError::Invalid {
                field: "expiry_warning_days",
                reason: format!("must not be negative, got {}", self.expiry_warning_days),
            });
        }

        Ok(Subject {
            resource_id: resource_id.to_string(),
            project_name: self.project_name.clone(),
            environment: self.environment.clone(),
            domain_name: self.domain_name.clone(),
        })
    }

    /// Thresholds handed to the alert policy.
    #[must_use]
    pub fn thresholds(&self) -> PolicyThresholds {
        PolicyThresholds {
            window: self.window,
            expiry_warning_days: self.expiry_warning_days,
        }
    }

    /// Configuration fields already known, for error descriptors.
    ///
    /// Only values that were actually supplied are included.
    #[must_use]
    pub fn resolved_fields(&self, kind: DomainKind) -> Map<String, Value> {
        let mut fields = Map::new();
        let mut put = |key: &str, value: Option<&String>| {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value.clone()));
            }
        };

        put(kind.resource_field(), self.resource_id.as_ref());
        put("project_name", self.project_name.as_ref());
        put("environment", self.environment.as_ref());
        if kind == DomainKind::Certificate {
            put("domain_name", self.domain_name.as_ref());
        }

        fields
    }
}

/// The resource an invocation evaluates, with its pass-through labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub resource_id: String,
    pub project_name: Option<String>,
    pub environment: Option<String>,
    pub domain_name: Option<String>,
}

/// Tunable thresholds used by the alert policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyThresholds {
    /// Backup evaluation window.
    pub window: Duration,
    /// Certificate warning threshold in days, inclusive.
    pub expiry_warning_days: i64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            window: Duration::hours(DEFAULT_WINDOW_HOURS),
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}
