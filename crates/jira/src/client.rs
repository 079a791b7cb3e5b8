//! HTTP client for the Jira Cloud REST API (v3).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::auth::Credentials;
use crate::error::JiraError;
use crate::models::{
    Filter, GetIssueOptions, Issue, IssueTypeStatuses, Project, ProjectListOptions, ProjectPage,
    SearchRequest, SearchResponse,
};

/// Largest page Jira accepts for JQL search.
pub const MAX_RESULTS: u32 = 100;

/// Page size used when the requested one is unset or out of range.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SEARCH_JQL_ENDPOINT: &str = "/rest/api/3/search/jql";
const ISSUE_ENDPOINT: &str = "/rest/api/3/issue";
const FILTER_ENDPOINT: &str = "/rest/api/3/filter";
const PROJECT_ENDPOINT: &str = "/rest/api/3/project";

/// Jira REST client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl JiraClient {
    /// Create a client for `base_url` (e.g. `https://your-domain.atlassian.net`)
    /// with the default request timeout.
    ///
    /// # Errors
    /// Returns error if the credentials are empty or the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, JiraError> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    /// Create a client whose every request fails once `timeout` elapses.
    ///
    /// # Errors
    /// Returns error if the credentials are empty or the HTTP client cannot be built
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, JiraError> {
        credentials.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Base URL requests are sent to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        self.credentials.apply(self.client.request(method, url))
    }

    /// Send a request and decode a 2xx JSON body.
    async fn execute<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, JiraError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JiraError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // =========================================================================
    // Issue Operations
    // =========================================================================

    /// Search issues with JQL.
    ///
    /// Only one page is fetched. `max_results` outside `1..=100` falls back
    /// to [`DEFAULT_MAX_RESULTS`].
    #[instrument(skip(self, request), fields(jql = %request.jql))]
    pub async fn search_jql(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError> {
        if request.jql.trim().is_empty() {
            return Err(JiraError::MissingArgument("JQL query"));
        }

        let mut body = request.clone();
        body.max_results = Some(clamp_max_results(request.max_results));

        let response: SearchResponse = self
            .execute(self.request(Method::POST, SEARCH_JQL_ENDPOINT).json(&body))
            .await?;

        debug!(
            count = response.issues.len(),
            is_last = response.is_last,
            "JQL search returned"
        );
        Ok(response)
    }

    /// Get an issue by ID or key.
    #[instrument(skip(self, options), fields(issue = %key))]
    pub async fn get_issue(
        &self,
        key: &str,
        options: &GetIssueOptions,
    ) -> Result<Issue, JiraError> {
        if key.trim().is_empty() {
            return Err(JiraError::MissingArgument("issue ID or key"));
        }

        let path = format!("{ISSUE_ENDPOINT}/{key}");
        let issue: Issue = self
            .execute(self.request(Method::GET, &path).query(&options.query_pairs()))
            .await?;

        debug!("Retrieved issue: {}", issue.key);
        Ok(issue)
    }

    /// Get a saved filter, including its JQL.
    #[instrument(skip(self), fields(filter_id = %filter_id))]
    pub async fn get_filter(&self, filter_id: &str) -> Result<Filter, JiraError> {
        if filter_id.trim().is_empty() {
            return Err(JiraError::MissingArgument("filter ID"));
        }

        let path = format!("{FILTER_ENDPOINT}/{filter_id}");
        self.execute(self.request(Method::GET, &path)).await
    }

    // =========================================================================
    // Project Operations
    // =========================================================================

    /// All projects visible to the caller.
    #[instrument(skip(self))]
    pub async fn get_all_projects(
        &self,
        options: &ProjectListOptions,
    ) -> Result<Vec<Project>, JiraError> {
        let query = options.query_pairs();
        self.execute(self.request(Method::GET, PROJECT_ENDPOINT).query(&query)).await
    }

    /// Get a project by ID or key.
    #[instrument(skip(self), fields(project = %key))]
    pub async fn get_project(&self, key: &str) -> Result<Project, JiraError> {
        if key.trim().is_empty() {
            return Err(JiraError::MissingArgument("project ID or key"));
        }

        let path = format!("{PROJECT_ENDPOINT}/{key}");
        self.execute(self.request(Method::GET, &path)).await
    }

    /// Search projects visible to the caller, one page at a time.
    #[instrument(skip(self))]
    pub async fn search_projects(
        &self,
        start_at: u32,
        max_results: u32,
        query: Option<&str>,
    ) -> Result<ProjectPage, JiraError> {
        let path = format!("{PROJECT_ENDPOINT}/search");
        let mut params = vec![
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            params.push(("query", query.to_string()));
        }

        self.execute(self.request(Method::GET, &path).query(&params)).await
    }

    /// Issue types of a project, each with the statuses it can take.
    #[instrument(skip(self), fields(project = %key))]
    pub async fn project_statuses(&self, key: &str) -> Result<Vec<IssueTypeStatuses>, JiraError> {
        if key.trim().is_empty() {
            return Err(JiraError::MissingArgument("project ID or key"));
        }

        let path = format!("{PROJECT_ENDPOINT}/{key}/statuses");
        self.execute(self.request(Method::GET, &path)).await
    }

    /// Projects the caller viewed most recently.
    #[instrument(skip(self))]
    pub async fn recent_projects(&self) -> Result<Vec<Project>, JiraError> {
        let path = format!("{PROJECT_ENDPOINT}/recent");
        self.execute(self.request(Method::GET, &path)).await
    }
}

fn clamp_max_results(requested: Option<u32>) -> u32 {
    match requested {
        Some(n) if (1..=MAX_RESULTS).contains(&n) => n,
        _ => DEFAULT_MAX_RESULTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_max_results() {
        assert_eq!(clamp_max_results(None), DEFAULT_MAX_RESULTS);
        assert_eq!(clamp_max_results(Some(0)), DEFAULT_MAX_RESULTS);
        assert_eq!(clamp_max_results(Some(1)), 1);
        assert_eq!(clamp_max_results(Some(100)), 100);
        assert_eq!(clamp_max_results(Some(1000)), DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            JiraClient::new("https://x.atlassian.net/", Credentials::token("t")).unwrap();
        assert_eq!(client.base_url(), "https://x.atlassian.net");
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let err = JiraClient::new("https://x.atlassian.net", Credentials::basic("me", ""))
            .unwrap_err();
        assert!(matches!(err, JiraError::InvalidCredentials(_)));
    }
}
