//! Presentation of a [`ReportDocument`](crate::assemble::ReportDocument).
//!
//! All renderers walk the same document, so grouping, ordering and update
//! text are identical across formats.

pub mod card;
pub mod html;
pub mod markdown;

use crate::assemble::ReportIssue;

/// Emoji shown before a status name.
#[must_use]
pub fn status_emoji(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "to do" | "open" | "new" | "created" => "📋",
        "in progress" | "in review" | "in development" => "🔄",
        "done" | "closed" | "resolved" | "completed" => "✅",
        "blocked" | "on hold" => "🚫",
        "testing" | "qa" | "review" => "🧪",
        _ => "📝",
    }
}

/// `Story | PAY-12 In Progress: Checkout`
fn issue_label(issue: &ReportIssue) -> String {
    format!(
        "{} | {} {}: {}",
        issue.issue_type, issue.key, issue.status, issue.summary
    )
}
