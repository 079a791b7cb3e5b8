//! Markdown rendering for console output.

use std::fmt::Write;

use super::issue_label;
use crate::assemble::{ReportDocument, ReportIssue, STANDALONE_TITLE};

/// Render the report as Markdown.
///
/// Epics are `##` headings linking to the epic, issues `###` headings.
/// Updates are numbered; subtasks continue the numbering with their own
/// updates as nested bullets.
pub fn render(doc: &ReportDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", doc.title);
    let _ = writeln!(out, "{}\n", doc.subtitle);

    for group in &doc.groups {
        match &group.epic {
            Some(epic) => {
                let _ = writeln!(
                    out,
                    "## [{} {}: {}]({})\n",
                    epic.key, epic.status, epic.summary, epic.url
                );
            }
            None => {
                let _ = writeln!(out, "## {STANDALONE_TITLE}\n");
            }
        }

        for issue in &group.issues {
            write_issue(&mut out, issue);
        }
    }

    out
}

fn write_issue(out: &mut String, issue: &ReportIssue) {
    let _ = writeln!(out, "### [{}]({})\n", issue_label(issue), issue.url);

    let mut number = 0;
    for update in &issue.updates {
        number += 1;
        let _ = writeln!(out, "{number}. {}", update.sentence());
    }
    for sub_task in &issue.sub_tasks {
        number += 1;
        let _ = writeln!(out, "{number}. [{}]({})", issue_label(sub_task), sub_task.url);
        for update in &sub_task.updates {
            let _ = writeln!(out, "   - {}", update.sentence());
        }
    }
    if number > 0 {
        out.push('\n');
    }
}
