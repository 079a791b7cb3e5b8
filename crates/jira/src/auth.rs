//! Authentication for Jira requests.

use std::fmt;

use reqwest::RequestBuilder;

use crate::error::JiraError;

/// Credentials attached to every Jira request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Account email (or username) plus API token or password, sent as HTTP Basic auth
    Basic { username: String, password: String },
    /// Personal access token, sent as a Bearer token
    Token(String),
}

impl Credentials {
    /// Basic auth credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token credentials.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Pick basic auth when a username is present, otherwise a bare token.
    pub fn from_parts(username: Option<&str>, secret: impl Into<String>) -> Self {
        match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(username) => Self::basic(username, secret),
            None => Self::token(secret),
        }
    }

    /// Reject credentials that can never authenticate.
    ///
    /// # Errors
    /// Returns [`JiraError::InvalidCredentials`] when the secret is empty.
    pub fn validate(&self) -> Result<(), JiraError> {
        match self {
            Self::Basic { password, .. } if password.is_empty() => {
                Err(JiraError::InvalidCredentials("password or API token is empty"))
            }
            Self::Token(token) if token.is_empty() => {
                Err(JiraError::InvalidCredentials("token is empty"))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Token(token) => request.bearer_auth(token),
        }
    }
}

// Never print secrets
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}
