//! HTML rendering as nested ordered lists, for Teams Workflow webhooks.

use std::fmt::Write;

use super::issue_label;
use crate::assemble::{ReportDocument, ReportIssue, STANDALONE_TITLE};

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the report as an HTML fragment.
pub fn render(doc: &ReportDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(&doc.title));
    let _ = writeln!(out, "<p>{}</p>", escape_html(&doc.subtitle));
    out.push_str("<ol>\n");

    for group in &doc.groups {
        out.push_str("  <li>\n");
        match &group.epic {
            Some(epic) => {
                let _ = writeln!(
                    out,
                    "    <h2><a href=\"{}\">{} {}: {}</a></h2>",
                    escape_html(&epic.url),
                    escape_html(&epic.key),
                    escape_html(&epic.status),
                    escape_html(&epic.summary)
                );
            }
            None => {
                let _ = writeln!(out, "    <h2>{STANDALONE_TITLE}</h2>");
            }
        }
        out.push_str("    <ol>\n");
        for issue in &group.issues {
            write_issue(&mut out, issue);
        }
        out.push_str("    </ol>\n");
        out.push_str("  </li>\n");
    }

    out.push_str("</ol>\n");
    out
}

fn write_issue(out: &mut String, issue: &ReportIssue) {
    out.push_str("      <li>\n");
    let _ = writeln!(
        out,
        "        <h3><a href=\"{}\">[{}]</a></h3>",
        escape_html(&issue.url),
        escape_html(&issue_label(issue))
    );
    out.push_str("        <ol>\n");
    for update in &issue.updates {
        let _ = writeln!(out, "          <li>{}</li>", escape_html(&update.sentence()));
    }
    for sub_task in &issue.sub_tasks {
        let _ = writeln!(
            out,
            "          <li><a href=\"{}\"><b>[{}]</b></a>",
            escape_html(&sub_task.url),
            escape_html(&issue_label(sub_task))
        );
        if !sub_task.updates.is_empty() {
            out.push_str("            <ul>\n");
            for update in &sub_task.updates {
                let _ = writeln!(out, "              <li>{}</li>", escape_html(&update.sentence()));
            }
            out.push_str("            </ul>\n");
        }
        out.push_str("          </li>\n");
    }
    out.push_str("        </ol>\n");
    out.push_str("      </li>\n");
}
