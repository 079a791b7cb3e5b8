//! The resolved report tree.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of activity item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Comment,
    Worklog,
}

impl UpdateKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Worklog => "worklog",
        }
    }
}

/// One comment or worklog inside the lookback window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    pub time: DateTime<Utc>,
    pub author: String,
    pub kind: UpdateKind,
    /// Plain text, untruncated
    pub content: String,
    /// Worklog duration such as `3h`; `None` for comments
    pub time_spent: Option<String>,
}

/// An issue placed in the report, with its recent activity and subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueUpdate {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub issue_type: String,
    pub url: String,
    /// Ascending by time
    pub updates: Vec<Update>,
    /// Latest update time, or the report time for ancestors without activity
    pub last_updated: DateTime<Utc>,
    pub sub_tasks: Vec<IssueUpdate>,
    #[serde(skip)]
    pub added_to_report: bool,
}

/// An epic and the non-subtask issues under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicGroup {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub url: String,
    pub issues: Vec<IssueUpdate>,
}

impl IssueUpdate {
    /// Whether the issue carries activity of its own.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }

    /// This issue and all nested subtasks, depth first.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &IssueUpdate> + '_> {
        Box::new(std::iter::once(self).chain(self.sub_tasks.iter().flat_map(IssueUpdate::walk)))
    }
}
