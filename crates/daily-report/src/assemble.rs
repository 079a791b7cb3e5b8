//! Report assembly: order the resolved tree and build a render-agnostic document.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use crate::model::{EpicGroup, IssueUpdate, Update, UpdateKind};
use crate::resolver::Resolution;

/// Longest update text shown before truncation, in characters.
pub const MAX_CONTENT_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Heading of the bucket for issues outside any epic.
pub const STANDALONE_TITLE: &str = "Anything else";

/// The query a report was built from, for the subtitle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    ProjectHours { project: String, hours: u32 },
    CustomJql(String),
    /// Saved filter; `name` may be empty
    Filter { id: String, name: String },
}

impl QuerySource {
    #[must_use]
    pub fn subtitle(&self) -> String {
        match self {
            Self::ProjectHours { project, hours } => {
                format!("From last updates in the last {hours} hours of project {project}")
            }
            Self::CustomJql(jql) => format!("From custom JQL: {jql}"),
            Self::Filter { id, name } if name.trim().is_empty() => {
                format!("From saved filter: {id}")
            }
            Self::Filter { name, .. } => format!("From saved filter: {name}"),
        }
    }
}

/// Render-agnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// `Daily Report 15-Jan-2024`
    pub title: String,
    pub subtitle: String,
    /// Timezone the times are shown in, after fallback
    pub timezone: String,
    /// Epic groups by ascending key, then the standalone group if non-empty
    pub groups: Vec<ReportGroup>,
}

/// An epic section, or the standalone section when `epic` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportGroup {
    pub epic: Option<EpicHeader>,
    /// Most recently active first
    pub issues: Vec<ReportIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicHeader {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportIssue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub issue_type: String,
    pub url: String,
    /// Oldest first
    pub updates: Vec<UpdateLine>,
    /// Most recently active first
    pub sub_tasks: Vec<ReportIssue>,
}

/// One activity line with the time already converted to the report timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateLine {
    /// `HH:MM`
    pub time: String,
    pub author: String,
    pub kind: UpdateKind,
    /// Truncated to [`MAX_CONTENT_CHARS`]
    pub text: String,
    pub time_spent: Option<String>,
}

impl ReportGroup {
    /// Section heading text (epic summary, or the standalone title).
    #[must_use]
    pub fn title(&self) -> &str {
        self.epic
            .as_ref()
            .map_or(STANDALONE_TITLE, |e| e.summary.as_str())
    }
}

impl UpdateLine {
    /// `10:30 → Ann commented: text` or `10:30 → Ann log work 3h: text`.
    #[must_use]
    pub fn sentence(&self) -> String {
        format!("{} → {}", self.time, self.action())
    }

    /// The sentence without the time prefix.
    #[must_use]
    pub fn action(&self) -> String {
        match self.kind {
            UpdateKind::Comment => format!("{} commented: {}", self.author, self.text),
            UpdateKind::Worklog => format!(
                "{} log work {}: {}",
                self.author,
                self.time_spent.as_deref().unwrap_or_default(),
                self.text
            ),
        }
    }
}

impl ReportDocument {
    /// Number of issues shown, subtasks included.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        fn count(issues: &[ReportIssue]) -> usize {
            issues.iter().map(|i| 1 + count(&i.sub_tasks)).sum()
        }
        self.groups.iter().map(|g| count(&g.issues)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Parse an IANA timezone name, falling back to UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(timezone = %name, "Unknown timezone, using UTC");
        Tz::UTC
    })
}

/// Cut text longer than [`MAX_CONTENT_CHARS`] to 197 characters plus `...`.
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CONTENT_CHARS {
        return text.to_string();
    }
    let kept: String = text
        .chars()
        .take(MAX_CONTENT_CHARS - ELLIPSIS.len())
        .collect();
    kept + ELLIPSIS
}

/// Order the resolved tree and convert it for rendering.
pub fn assemble(
    resolution: Resolution,
    now: DateTime<Utc>,
    timezone: &str,
    source: &QuerySource,
) -> ReportDocument {
    let tz = resolve_timezone(timezone);
    let Resolution {
        epic_groups,
        standalone,
    } = resolution;

    // BTreeMap iteration is already ascending by key
    let mut groups: Vec<ReportGroup> = epic_groups
        .into_values()
        .map(|group| epic_section(group, tz))
        .collect();

    if !standalone.is_empty() {
        groups.push(ReportGroup {
            epic: None,
            issues: issue_list(standalone, tz),
        });
    }

    ReportDocument {
        title: format!("Daily Report {}", now.with_timezone(&tz).format("%d-%b-%Y")),
        subtitle: source.subtitle(),
        timezone: tz.name().to_string(),
        groups,
    }
}

fn epic_section(group: EpicGroup, tz: Tz) -> ReportGroup {
    ReportGroup {
        epic: Some(EpicHeader {
            key: group.key,
            summary: group.summary,
            status: group.status,
            url: group.url,
        }),
        issues: issue_list(group.issues, tz),
    }
}

fn issue_list(mut issues: Vec<IssueUpdate>, tz: Tz) -> Vec<ReportIssue> {
    issues.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    issues.into_iter().map(|i| report_issue(i, tz)).collect()
}

fn report_issue(issue: IssueUpdate, tz: Tz) -> ReportIssue {
    ReportIssue {
        key: issue.key,
        summary: issue.summary,
        status: issue.status,
        issue_type: issue.issue_type,
        url: issue.url,
        updates: issue
            .updates
            .into_iter()
            .map(|u| update_line(u, tz))
            .collect(),
        sub_tasks: issue_list(issue.sub_tasks, tz),
    }
}

fn update_line(update: Update, tz: Tz) -> UpdateLine {
    UpdateLine {
        time: update.time.with_timezone(&tz).format("%H:%M").to_string(),
        author: update.author,
        kind: update.kind,
        text: truncate(&update.content),
        time_spent: update.time_spent,
    }
}
