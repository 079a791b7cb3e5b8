//! Jira REST API v3 request and response types.
//!
//! Only the fields the report pipeline reads are modelled. Every field
//! defaults when absent because most calls use field projections
//! (`?fields=issuetype,parent`) and Jira omits whatever was not requested.

use serde::{Deserialize, Serialize};

use crate::adf::Body;
use crate::EPIC_ISSUE_TYPE;

// =========================================================================
// Issues
// =========================================================================

/// A Jira issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    pub fields: IssueFields,
}

/// The `fields` object of an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    pub summary: String,
    pub status: Status,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    pub comment: CommentPage,
    pub worklog: WorklogPage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Issue status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
}

/// Issue type (Epic, Story, Task, Sub-task, Bug, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueType {
    pub id: String,
    pub name: String,
    pub subtask: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_level: Option<i32>,
}

/// Reference to a parent issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentRef {
    pub id: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ParentFields>,
}

/// The abbreviated fields Jira embeds in a parent reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentFields {
    pub summary: String,
    pub status: Status,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueType,
}

/// A Jira user as embedded in comments and worklogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub account_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

/// A page of comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub start_at: u32,
    pub max_results: u32,
    pub total: u32,
}

/// A single issue comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    pub created: String,
    pub updated: String,
}

/// A page of worklogs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorklogPage {
    pub worklogs: Vec<Worklog>,
    pub start_at: u32,
    pub max_results: u32,
    pub total: u32,
}

/// A single worklog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Worklog {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Body>,
    pub created: String,
    pub updated: String,
    pub started: String,
    /// Human-readable duration, e.g. `2h 30m`
    pub time_spent: String,
    pub time_spent_seconds: i64,
}

impl Issue {
    /// Key of the parent issue, if any.
    #[must_use]
    pub fn parent_key(&self) -> Option<&str> {
        self.fields
            .parent
            .as_ref()
            .map(|p| p.key.as_str())
            .filter(|k| !k.is_empty())
    }

    #[must_use]
    pub fn issue_type_name(&self) -> &str {
        &self.fields.issue_type.name
    }

    #[must_use]
    pub fn is_epic(&self) -> bool {
        self.fields.issue_type.name == EPIC_ISSUE_TYPE
    }

    /// Browser URL of this issue on the given Jira host.
    #[must_use]
    pub fn browse_url(&self, host: &str) -> String {
        browse_url(host, &self.key)
    }
}

/// `{host}/browse/{key}`, tolerating a trailing slash on the host.
#[must_use]
pub fn browse_url(host: &str, key: &str) -> String {
    format!("{}/browse/{key}", host.trim_end_matches('/'))
}

// =========================================================================
// Search
// =========================================================================

/// Body of `POST /rest/api/3/search/jql`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub jql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl SearchRequest {
    pub fn new(jql: impl Into<String>) -> Self {
        Self {
            jql: jql.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }
}

/// Response of `POST /rest/api/3/search/jql`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResponse {
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    pub is_last: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Query options for `GET /rest/api/3/issue/{key}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetIssueOptions {
    pub expand: Vec<String>,
    pub fields: Vec<String>,
    pub properties: Vec<String>,
}

impl GetIssueOptions {
    /// Only return the given fields.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand.push(expand.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.properties.push(property.into());
        self
    }

    /// Repeated query parameters, in Jira's `?fields=a&fields=b` style.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let expand = self.expand.iter().map(|v| ("expand", v.as_str()));
        let fields = self.fields.iter().map(|v| ("fields", v.as_str()));
        let properties = self.properties.iter().map(|v| ("properties", v.as_str()));
        expand.chain(fields).chain(properties).collect()
    }
}

// =========================================================================
// Filters and projects
// =========================================================================

/// A saved filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub id: String,
    pub name: String,
    pub jql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Jira project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type_key: Option<String>,
    pub archived: bool,
}

/// A page of projects from `GET /rest/api/3/project/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPage {
    pub values: Vec<Project>,
    pub start_at: u32,
    pub max_results: u32,
    pub total: u32,
    pub is_last: bool,
}

/// Query options for `GET /rest/api/3/project`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListOptions {
    /// e.g. `description`, `issueTypes`, `lead`
    pub expand: Vec<String>,
    /// Only the caller's most recently accessed projects (Jira caps this at 20)
    pub recent: Option<u32>,
    pub properties: Vec<String>,
}

impl ProjectListOptions {
    #[must_use]
    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand.push(expand.into());
        self
    }

    #[must_use]
    pub fn recent(mut self, count: u32) -> Self {
        self.recent = Some(count);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.properties.push(property.into());
        self
    }

    /// Comma-separated list parameters; unset options are left out.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![];
        if !self.expand.is_empty() {
            pairs.push(("expand", self.expand.join(",")));
        }
        if let Some(recent) = self.recent.filter(|n| *n > 0) {
            pairs.push(("recent", recent.to_string()));
        }
        if !self.properties.is_empty() {
            pairs.push(("properties", self.properties.join(",")));
        }
        pairs
    }
}

/// An issue type of a project and the statuses its workflow uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueTypeStatuses {
    pub id: String,
    pub name: String,
    pub subtask: bool,
    pub statuses: Vec<Status>,
}
