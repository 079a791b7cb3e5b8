//! In-memory issue repository and fixtures for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jira::{
    Body, Comment, Filter, GetIssueOptions, Issue, IssueRepository, JiraError, ParentRef,
    SearchRequest, SearchResponse, User, Worklog,
};

use crate::assemble::{EpicHeader, ReportDocument, ReportGroup, ReportIssue, UpdateLine};
use crate::model::UpdateKind;

/// 2024-01-15 at the given UTC time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
}

pub fn jira_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}

pub fn issue(key: &str, issue_type: &str) -> Issue {
    let mut issue = Issue {
        id: key.to_string(),
        key: key.to_string(),
        ..Issue::default()
    };
    issue.fields.summary = format!("{key} summary");
    issue.fields.status.name = "To Do".to_string();
    issue.fields.issue_type.name = issue_type.to_string();
    issue.fields.issue_type.subtask = issue_type == "Sub-task";
    issue
}

fn user(name: &str) -> Option<User> {
    Some(User {
        account_id: name.to_lowercase(),
        display_name: name.to_string(),
        email_address: None,
    })
}

/// Chainable fixture setters.
pub trait IssueFixture {
    fn parent(self, key: &str) -> Self;
    fn summary(self, summary: &str) -> Self;
    fn status(self, status: &str) -> Self;
    fn comment(self, time: DateTime<Utc>, author: &str, text: &str) -> Self;
    fn worklog(self, time: DateTime<Utc>, author: &str, spent: &str, text: &str) -> Self;
}

impl IssueFixture for Issue {
    fn parent(mut self, key: &str) -> Self {
        self.fields.parent = Some(ParentRef {
            id: key.to_string(),
            key: key.to_string(),
            fields: None,
        });
        self
    }

    fn summary(mut self, summary: &str) -> Self {
        self.fields.summary = summary.to_string();
        self
    }

    fn status(mut self, status: &str) -> Self {
        self.fields.status.name = status.to_string();
        self
    }

    fn comment(mut self, time: DateTime<Utc>, author: &str, text: &str) -> Self {
        self.fields.comment.comments.push(Comment {
            author: user(author),
            body: Some(Body::from(text)),
            created: jira_time(time),
            updated: jira_time(time),
            ..Comment::default()
        });
        self.fields.comment.total += 1;
        self
    }

    fn worklog(mut self, time: DateTime<Utc>, author: &str, spent: &str, text: &str) -> Self {
        self.fields.worklog.worklogs.push(Worklog {
            author: user(author),
            comment: Some(Body::from(text)),
            created: jira_time(time),
            updated: jira_time(time),
            started: jira_time(time),
            time_spent: spent.to_string(),
            ..Worklog::default()
        });
        self.fields.worklog.total += 1;
        self
    }
}

fn server_error(key: &str) -> JiraError {
    JiraError::Status {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: format!("lookup of {key} failed"),
    }
}

/// Repository backed by a map, recording every call.
#[derive(Default)]
pub struct FakeRepository {
    issues: HashMap<String, Issue>,
    filters: HashMap<String, Filter>,
    search_results: Vec<Issue>,
    search_fails: bool,
    failing: HashSet<String>,
    failing_full: HashSet<String>,
    calls: Mutex<Vec<String>>,
    searches: Mutex<Vec<SearchRequest>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, issue: Issue) -> Self {
        self.issues.insert(issue.key.clone(), issue);
        self
    }

    pub fn with_filter(mut self, id: &str, name: &str, jql: &str) -> Self {
        self.filters.insert(
            id.to_string(),
            Filter {
                id: id.to_string(),
                name: name.to_string(),
                jql: jql.to_string(),
                description: None,
            },
        );
        self
    }

    pub fn with_search_results(mut self, issues: Vec<Issue>) -> Self {
        self.search_results = issues;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    /// Every lookup of `key` fails.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Only lookups of `key` that request comments fail.
    pub fn failing_full_fetch(mut self, key: &str) -> Self {
        self.failing_full.insert(key.to_string());
        self
    }

    /// `get_issue` calls as `KEY:full` or `KEY:projection`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }

    pub fn full_fetches(&self, key: &str) -> usize {
        self.count(&format!("{key}:full"))
    }

    pub fn projection_fetches(&self, key: &str) -> usize {
        self.count(&format!("{key}:projection"))
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

#[async_trait]
impl IssueRepository for FakeRepository {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, JiraError> {
        self.searches.lock().unwrap().push(request.clone());
        if self.search_fails {
            return Err(server_error("search"));
        }
        Ok(SearchResponse {
            issues: self.search_results.clone(),
            total: None,
            is_last: true,
            next_page_token: None,
        })
    }

    async fn get_issue(&self, key: &str, options: &GetIssueOptions) -> Result<Issue, JiraError> {
        let full = options.fields.iter().any(|f| f == "comment");
        let kind = if full { "full" } else { "projection" };
        self.calls.lock().unwrap().push(format!("{key}:{kind}"));

        if self.failing.contains(key) || (full && self.failing_full.contains(key)) {
            return Err(server_error(key));
        }

        let mut issue = self.issues.get(key).cloned().ok_or_else(|| JiraError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "Issue does not exist".to_string(),
        })?;
        if !full {
            issue.fields.comment = jira::CommentPage::default();
            issue.fields.worklog = jira::WorklogPage::default();
        }
        Ok(issue)
    }

    async fn get_filter(&self, filter_id: &str) -> Result<Filter, JiraError> {
        self.filters.get(filter_id).cloned().ok_or_else(|| JiraError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "Filter not found".to_string(),
        })
    }
}

fn report_issue(key: &str, issue_type: &str, status: &str, summary: &str) -> ReportIssue {
    ReportIssue {
        key: key.to_string(),
        summary: summary.to_string(),
        status: status.to_string(),
        issue_type: issue_type.to_string(),
        url: format!("https://jira.example.com/browse/{key}"),
        updates: vec![],
        sub_tasks: vec![],
    }
}

fn line(time: &str, author: &str, text: &str, time_spent: Option<&str>) -> UpdateLine {
    UpdateLine {
        time: time.to_string(),
        author: author.to_string(),
        kind: if time_spent.is_some() {
            UpdateKind::Worklog
        } else {
            UpdateKind::Comment
        },
        text: text.to_string(),
        time_spent: time_spent.map(str::to_string),
    }
}

/// One epic with a story and subtask, plus one standalone bug.
pub fn sample_document() -> ReportDocument {
    let mut sub_task = report_issue("T-1", "Sub-task", "Done", "Fix flake");
    sub_task.updates = vec![line("11:00", "Bob", "wired it up", Some("3h"))];

    let mut story = report_issue("S-1", "Story", "In Progress", "Checkout <v2>");
    story.updates = vec![line("10:30", "Ann", "Ship it & celebrate", None)];
    story.sub_tasks = vec![sub_task];

    let mut bug = report_issue("B-1", "Bug", "To Do", "Crash");
    bug.updates = vec![line("09:15", "Cy", "repro attached", None)];

    ReportDocument {
        title: "Daily Report 15-Jan-2024".to_string(),
        subtitle: "From last updates in the last 24 hours of project PAY".to_string(),
        timezone: "UTC".to_string(),
        groups: vec![
            ReportGroup {
                epic: Some(EpicHeader {
                    key: "E-1".to_string(),
                    summary: "Payments".to_string(),
                    status: "In Progress".to_string(),
                    url: "https://jira.example.com/browse/E-1".to_string(),
                }),
                issues: vec![story],
            },
            ReportGroup {
                epic: None,
                issues: vec![bug],
            },
        ],
    }
}
