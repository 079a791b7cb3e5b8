//! Command-line and environment configuration.
//!
//! Every flag can also be set through its environment variable. Parsing is
//! lenient (everything optional); [`ReportArgs::into_config`] enforces the
//! rules for the selected query mode and returns a validated [`ReportConfig`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use jira::Credentials;
use url::Url;

use crate::error::ConfigError;

/// Default lookback window.
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

/// Page size requested from the search endpoint.
pub const DEFAULT_SEARCH_RESULTS: u32 = 100;

/// Which issues the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueryType {
    /// Issues of one project updated within the lookback window
    #[default]
    ProjectHours,
    /// A JQL query given verbatim
    CustomJql,
    /// A saved Jira filter
    Filter,
}

/// Payload posted to the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WebhookFormat {
    /// Teams message wrapping an AdaptiveCard
    #[default]
    Card,
    /// `{"body": "<html>"}` for Teams Workflow webhooks
    Html,
}

/// Format printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
    /// AdaptiveCard JSON
    Card,
}

/// Raw flags and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "jira-daily-report")]
#[command(about = "Post a daily digest of Jira comments and worklogs to Microsoft Teams")]
#[command(version)]
pub struct ReportArgs {
    /// Jira site, e.g. https://your-domain.atlassian.net
    #[arg(long, env = "JIRA_HOST")]
    pub jira_host: Option<String>,

    /// Account email for basic auth; leave unset to send the password as a bearer token
    #[arg(long, env = "JIRA_USERNAME")]
    pub jira_username: Option<String>,

    /// API token or password
    #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true)]
    pub jira_password: Option<String>,

    /// Query mode
    #[arg(long, env = "QUERY_TYPE", value_enum, default_value_t = QueryType::ProjectHours)]
    pub query_type: QueryType,

    /// Project key for project-hours queries
    #[arg(long, env = "JIRA_PROJECT")]
    pub jira_project: Option<String>,

    /// Lookback window in hours
    #[arg(long, env = "LOOKBACK_HOURS", default_value_t = DEFAULT_LOOKBACK_HOURS)]
    pub lookback_hours: u32,

    /// JQL for custom-jql queries
    #[arg(long, env = "CUSTOM_JQL")]
    pub custom_jql: Option<String>,

    /// Saved filter id for filter queries
    #[arg(long, env = "FILTER_ID")]
    pub filter_id: Option<String>,

    /// IANA timezone for report timestamps (invalid names fall back to UTC)
    #[arg(long, env = "REPORT_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// Teams incoming webhook or Workflow URL
    #[arg(long, env = "WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Webhook payload format
    #[arg(long, env = "WEBHOOK_FORMAT", value_enum, default_value_t = WebhookFormat::Card)]
    pub webhook_format: WebhookFormat,

    /// Report format printed to stdout
    #[arg(long, env = "REPORT_OUTPUT", value_enum, default_value_t = OutputFormat::Markdown)]
    pub output: OutputFormat,

    /// Search page size (1-100)
    #[arg(long, env = "JIRA_MAX_RESULTS", default_value_t = DEFAULT_SEARCH_RESULTS)]
    pub max_results: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "JIRA_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print the report without posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Query mode with the settings it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    ProjectHours { project: String },
    CustomJql(String),
    Filter { id: String },
}

/// Validated report settings.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Without trailing slash
    pub jira_host: String,
    pub credentials: Credentials,
    pub query: QueryMode,
    pub lookback_hours: u32,
    pub timezone: String,
    pub webhook_url: String,
    pub webhook_format: WebhookFormat,
    pub output: OutputFormat,
    pub max_results: u32,
    pub timeout: Duration,
    pub dry_run: bool,
}

impl ReportConfig {
    /// Cutoff for activity: `now` minus the lookback window.
    #[must_use]
    pub fn lookback_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::hours(i64::from(self.lookback_hours))
    }
}

impl ReportArgs {
    /// Validate the flags for the selected query mode.
    pub fn into_config(self) -> Result<ReportConfig, ConfigError> {
        let jira_host = non_empty(self.jira_host).ok_or(ConfigError::MissingJiraHost)?;
        let jira_host = validate_url("Jira host", &jira_host)?;

        let password = non_empty(self.jira_password).ok_or(ConfigError::MissingCredential)?;
        let credentials = Credentials::from_parts(self.jira_username.as_deref(), password);

        let webhook_url = non_empty(self.webhook_url).ok_or(ConfigError::MissingWebhookUrl)?;
        let webhook_url = validate_url("webhook", &webhook_url)?;

        if self.lookback_hours == 0 {
            return Err(ConfigError::InvalidLookbackHours);
        }

        let query = match self.query_type {
            QueryType::ProjectHours => QueryMode::ProjectHours {
                project: non_empty(self.jira_project).ok_or(ConfigError::MissingJiraProject)?,
            },
            QueryType::CustomJql => QueryMode::CustomJql(
                non_empty(self.custom_jql).ok_or(ConfigError::MissingCustomJql)?,
            ),
            QueryType::Filter => QueryMode::Filter {
                id: non_empty(self.filter_id).ok_or(ConfigError::MissingFilterId)?,
            },
        };

        Ok(ReportConfig {
            jira_host: jira_host.trim_end_matches('/').to_string(),
            credentials,
            query,
            lookback_hours: self.lookback_hours,
            timezone: self.timezone.trim().to_string(),
            webhook_url,
            webhook_format: self.webhook_format,
            output: self.output,
            max_results: self.max_results,
            timeout: Duration::from_secs(self.timeout_secs),
            dry_run: self.dry_run,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_url(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };

    let parsed = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(value.to_string())
}
