//! Error types for report generation.

use thiserror::Error;

/// Invalid or incomplete configuration, detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Jira host is required")]
    MissingJiraHost,

    #[error("Jira password or API token is required")]
    MissingCredential,

    #[error("webhook URL is required")]
    MissingWebhookUrl,

    /// A URL setting does not parse as an absolute http(s) URL
    #[error("invalid {field} URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Jira project is required for project-hours queries")]
    MissingJiraProject,

    #[error("custom JQL is required for custom-jql queries")]
    MissingCustomJql,

    #[error("filter id is required for filter queries")]
    MissingFilterId,

    #[error("lookback hours must be greater than zero")]
    InvalidLookbackHours,
}

/// Report failure, categorised by pipeline phase.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration rejected before any I/O
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The initial search (or filter lookup) failed; no partial report
    #[error("search failed: {0}")]
    Search(#[source] jira::JiraError),

    /// The report could not be built from the search result
    #[error("generate failed: {0}")]
    Generate(String),

    /// Webhook delivery failed; the rendered report is still available
    #[error("publish failed: {0}")]
    Publish(#[from] notify::ChannelError),
}

impl ReportError {
    /// Short phase name for logs.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Search(_) => "search",
            Self::Generate(_) => "generate",
            Self::Publish(_) => "publish",
        }
    }
}
