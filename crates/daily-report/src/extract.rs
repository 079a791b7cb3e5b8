//! Recent activity extraction.
//!
//! Turns an issue's comments and worklogs into [`Update`]s, keeping only
//! items created strictly after the lookback cutoff and flattening rich-text
//! bodies to plain text. Unparseable timestamps drop the single item.

use chrono::{DateTime, Utc};
use jira::{AdfNode, Body, Issue, User};
use tracing::debug;

use crate::model::{IssueUpdate, Update, UpdateKind};

/// Timestamp format of Jira's `created`/`updated` fields, e.g. `2024-01-15T10:30:00.000+0000`.
pub const JIRA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Updates of one issue plus the newest update time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Ascending by time
    pub updates: Vec<Update>,
    /// Newest update time, Unix epoch when there are none
    pub last_updated: DateTime<Utc>,
}

/// Parse a Jira timestamp, falling back to RFC 3339.
pub fn parse_jira_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, JIRA_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Extract the comments and worklogs created after `lookback`.
pub fn extract_updates(issue: &Issue, lookback: DateTime<Utc>) -> Extraction {
    let comments = issue.fields.comment.comments.iter().map(|c| {
        (
            c.created.as_str(),
            c.author.as_ref(),
            UpdateKind::Comment,
            c.body.as_ref(),
            None,
        )
    });
    let worklogs = issue.fields.worklog.worklogs.iter().map(|w| {
        (
            w.created.as_str(),
            w.author.as_ref(),
            UpdateKind::Worklog,
            w.comment.as_ref(),
            Some(w.time_spent.clone()),
        )
    });

    let mut updates: Vec<Update> = comments
        .chain(worklogs)
        .filter_map(|(created, author, kind, body, time_spent)| {
            let Some(time) = parse_jira_time(created) else {
                debug!(
                    issue = %issue.key,
                    kind = kind.as_str(),
                    created,
                    "Skipping item with unparseable timestamp"
                );
                return None;
            };
            (time > lookback).then(|| Update {
                time,
                author: display_name(author),
                kind,
                content: body_text(body),
                time_spent,
            })
        })
        .collect();

    // Stable: equal timestamps keep comments before worklogs
    updates.sort_by_key(|u| u.time);

    let last_updated = updates
        .iter()
        .map(|u| u.time)
        .max()
        .unwrap_or(DateTime::UNIX_EPOCH);

    Extraction {
        updates,
        last_updated,
    }
}

/// Build the report node for an issue from its extraction.
pub fn issue_update(issue: &Issue, host: &str, extraction: Extraction) -> IssueUpdate {
    IssueUpdate {
        key: issue.key.clone(),
        summary: issue.fields.summary.clone(),
        status: issue.fields.status.name.clone(),
        issue_type: issue.fields.issue_type.name.clone(),
        url: issue.browse_url(host),
        updates: extraction.updates,
        last_updated: extraction.last_updated,
        sub_tasks: vec![],
        added_to_report: false,
    }
}

fn display_name(author: Option<&User>) -> String {
    author.map(|a| a.display_name.clone()).unwrap_or_default()
}

/// Plain text of a comment or worklog body.
///
/// Plain strings are used verbatim. Documents contribute their `text` leaves
/// joined by single spaces, trimmed per container node. Anything else
/// degrades to its raw JSON.
pub fn body_text(body: Option<&Body>) -> String {
    match body {
        None => String::new(),
        Some(Body::Plain(text)) => text.clone(),
        Some(Body::Document(node)) => node_text(node),
        Some(Body::Other(value)) => match value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// Text leaves are kept verbatim; every other node joins its children with
/// a single space and trims the result.
fn node_text(node: &AdfNode) -> String {
    if node.is_text() {
        if let Some(text) = &node.text {
            return text.clone();
        }
    }

    let mut out = String::new();
    for child in &node.content {
        out.push_str(&node_text(child));
        out.push(' ');
    }
    out.trim().to_string()
}
