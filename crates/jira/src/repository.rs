//! The issue lookup capability consumers depend on.

use async_trait::async_trait;

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::models::{Filter, GetIssueOptions, Issue, SearchRequest, SearchResponse};

/// Read access to issues: search by query, fetch by key, resolve saved filters.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Run one search page.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError>;

    /// Fetch a single issue.
    async fn get_issue(&self, key: &str, options: &GetIssueOptions) -> Result<Issue, JiraError>;

    /// Resolve a saved filter to its JQL and display name.
    async fn get_filter(&self, filter_id: &str) -> Result<Filter, JiraError>;
}

#[async_trait]
impl IssueRepository for JiraClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError> {
        self.search_jql(request).await
    }

    async fn get_issue(&self, key: &str, options: &GetIssueOptions) -> Result<Issue, JiraError> {
        JiraClient::get_issue(self, key, options).await
    }

    async fn get_filter(&self, filter_id: &str) -> Result<Filter, JiraError> {
        JiraClient::get_filter(self, filter_id).await
    }
}
