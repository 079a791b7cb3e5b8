//! Error types for the Jira client.

use thiserror::Error;

/// Errors returned by Jira API calls.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Transport failure, timeout or undecodable response body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Jira answered with a non-2xx status
    #[error("Jira returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body was not the expected JSON shape
    #[error("Failed to decode Jira response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Credentials are unusable (empty secret)
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(&'static str),

    /// A required argument was empty
    #[error("{0} is required")]
    MissingArgument(&'static str),
}

impl JiraError {
    /// HTTP status of the failed call, if Jira answered at all.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether Jira reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}
