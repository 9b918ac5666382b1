//! infrawatch - run one backup or certificate health check.
//!
//! Prints the result envelope as JSON on stdout and exits non-zero when the
//! evaluation could not complete. Logs go to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use infrawatch_cloud::aws::DEFAULT_REGION;
use infrawatch_cloud::{AwsClient, BackupClient, CertificateClient};
use infrawatch_health::config::{
    ENV_DOMAIN_NAME, ENV_ENVIRONMENT, ENV_EXPIRY_WARNING_DAYS, ENV_NOTIFICATION_TARGET,
    ENV_PROJECT_NAME, ENV_RESOURCE_ID, ENV_WINDOW_HOURS,
};
use infrawatch_health::{
    BackupDomain, CertificateDomain, ConfigError, DomainKind, Monitor, MonitorConfig,
    MonitorDomain, MonitorError, ResultEnvelope,
};

/// Resource health checks for backup vaults and TLS certificates.
#[derive(Parser, Debug)]
#[command(name = "infrawatch")]
#[command(about = "Evaluate backup recovery points or certificate expiry and alert on problems")]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true, env = "LOG_FORMAT")]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate recovery points created in a backup vault during the window
    Backup {
        /// Backup vault name
        #[arg(long, env = ENV_RESOURCE_ID)]
        vault: Option<String>,

        /// Window length in hours
        #[arg(long, env = ENV_WINDOW_HOURS)]
        window_hours: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Check the expiry of an ACM certificate
    Certificate {
        /// Certificate ARN
        #[arg(long, env = ENV_RESOURCE_ID)]
        certificate_arn: Option<String>,

        /// Domain label used in the summary and alert
        #[arg(long, env = ENV_DOMAIN_NAME)]
        domain_name: Option<String>,

        /// Alert when this many days or fewer remain
        #[arg(long, env = ENV_EXPIRY_WARNING_DAYS)]
        expiry_warning_days: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Project label
    #[arg(long, env = ENV_PROJECT_NAME)]
    project: Option<String>,

    /// Environment label
    #[arg(long, env = ENV_ENVIRONMENT)]
    environment: Option<String>,

    /// Where alerts are delivered (Slack or webhook URL, or SNS topic ARN)
    #[arg(long, env = ENV_NOTIFICATION_TARGET)]
    notification_target: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Override the AWS service endpoint (VPC endpoint, emulator)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint: Option<String>,

    /// Evaluate without delivering alerts
    #[arg(long)]
    no_notify: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Commands {
    fn kind(&self) -> DomainKind {
        match self {
            Self::Backup { .. } => DomainKind::Backup,
            Self::Certificate { .. } => DomainKind::Certificate,
        }
    }

    fn common(&self) -> &CommonArgs {
        match self {
            Self::Backup { common, .. } | Self::Certificate { common, .. } => common,
        }
    }

    /// Value for a configuration key, as supplied by flag or environment.
    fn lookup(&self, key: &str) -> Option<String> {
        let common = self.common();
        match (self, key) {
            (_, ENV_PROJECT_NAME) => common.project.clone(),
            (_, ENV_ENVIRONMENT) => common.environment.clone(),
            (_, ENV_NOTIFICATION_TARGET) => common.notification_target.clone(),
            (Self::Backup { vault, .. }, ENV_RESOURCE_ID) => vault.clone(),
            (Self::Backup { window_hours, .. }, ENV_WINDOW_HOURS) => window_hours.clone(),
            (
                Self::Certificate {
                    certificate_arn, ..
                },
                ENV_RESOURCE_ID,
            ) => certificate_arn.clone(),
            (Self::Certificate { domain_name, .. }, ENV_DOMAIN_NAME) => domain_name.clone(),
            (
                Self::Certificate {
                    expiry_warning_days,
                    ..
                },
                ENV_EXPIRY_WARNING_DAYS,
            ) => expiry_warning_days.clone(),
            _ => None,
        }
    }

    fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::from_lookup(|key| self.lookup(key))
    }
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn attach_notifier<D: MonitorDomain>(
    monitor: Monitor<D>,
    common: &CommonArgs,
    aws: &AwsClient,
) -> Monitor<D> {
    if common.no_notify {
        info!("Alert delivery disabled by --no-notify");
        return monitor;
    }

    let notifier = notify::Notifier::from_env()
        .with_channel(Arc::new(notify::SnsChannel::new(aws.sdk_config())));
    if notifier.has_channels() {
        monitor.with_notifier(Arc::new(notifier))
    } else {
        monitor
    }
}

async fn run(command: &Commands) -> ResultEnvelope {
    let common = command.common();
    let config = command.monitor_config();

    let aws = match AwsClient::load(common.region.clone(), common.endpoint.as_deref()).await {
        Ok(aws) => aws,
        Err(e) => {
            let kind = command.kind();
            let error = MonitorError::Config(ConfigError::Invalid {
                field: "endpoint",
                reason: e.to_string(),
            });
            return ResultEnvelope::failure(kind, &error, config.resolved_fields(kind));
        }
    };

    match command {
        Commands::Backup { .. } => {
            let client = Arc::new(BackupClient::new(&aws));
            let monitor = Monitor::new(config, BackupDomain::new(client.clone()), client);
            attach_notifier(monitor, common, &aws).run().await
        }
        Commands::Certificate { .. } => {
            let client = Arc::new(CertificateClient::new(&aws));
            let monitor = Monitor::new(config, CertificateDomain::new(), client);
            attach_notifier(monitor, common, &aws).run().await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose);

    let envelope = run(&cli.command).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).context("failed to encode result")?
    );

    if !envelope.is_success() {
        warn!(status = envelope.status_code, "Health check did not complete");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_backup_flags_feed_config() {
        let cli = Cli::try_parse_from([
            "infrawatch",
            "backup",
            "--vault",
            "prod-vault",
            "--window-hours",
            "12",
            "--project",
            "shop",
            "--environment",
            "prod",
        ])
        .unwrap();

        let config = cli.command.monitor_config();
        assert_eq!(config.resource_id.as_deref(), Some("prod-vault"));
        assert_eq!(config.project_name.as_deref(), Some("shop"));
        assert_eq!(config.window.num_hours(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_window_surfaces_at_validation() {
        let cli = Cli::try_parse_from([
            "infrawatch",
            "backup",
            "--vault",
            "prod-vault",
            "--window-hours",
            "soon",
        ])
        .unwrap();

        assert!(cli.command.monitor_config().validate().is_err());
    }

    #[test]
    fn test_certificate_flags_feed_config() {
        let cli = Cli::try_parse_from([
            "infrawatch",
            "--log-format",
            "json",
            "certificate",
            "--certificate-arn",
            "arn:aws:acm:us-east-1:123456789012:certificate/abc",
            "--domain-name",
            "example.com",
            "--expiry-warning-days",
            "14",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        let config = cli.command.monitor_config();
        assert_eq!(config.domain_name.as_deref(), Some("example.com"));
        assert_eq!(config.expiry_warning_days, 14);
        assert_eq!(config.thresholds().expiry_warning_days, 14);
    }

    #[tokio::test]
    async fn test_invalid_endpoint_yields_failure_envelope() {
        let cli = Cli::try_parse_from([
            "infrawatch",
            "backup",
            "--vault",
            "prod-vault",
            "--endpoint",
            "not a url",
            "--no-notify",
        ])
        .unwrap();

        let envelope = run(&cli.command).await;
        assert_eq!(envelope.status_code, 500);
        let error = envelope.error_message().unwrap();
        assert!(error.starts_with("Error during backup validation"));
        assert!(error.contains("endpoint"));
        assert_eq!(envelope.body["backup_vault_name"], "prod-vault");
    }

    #[test]
    fn test_command_kind() {
        let cli = Cli::try_parse_from(["infrawatch", "certificate", "--certificate-arn", "arn"])
            .unwrap();
        assert_eq!(cli.command.kind(), DomainKind::Certificate);
    }
}
