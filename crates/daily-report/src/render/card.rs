//! AdaptiveCard rendering for Teams.

use notify::{text_block, AdaptiveCard};

use super::status_emoji;
use crate::assemble::{ReportDocument, ReportIssue, STANDALONE_TITLE};

/// Build the report card: title, subtitle, then one header block per group
/// and per issue with numbered update lines. Each subtask becomes a container
/// continuing its parent's numbering.
pub fn render(doc: &ReportDocument) -> AdaptiveCard {
    let mut card = AdaptiveCard::new();
    card.add_text_block(&doc.title, "ExtraLarge", "Bolder", true);
    card.add_text_block(format!("> {}", doc.subtitle), "Medium", "", true);

    for group in &doc.groups {
        let header = match &group.epic {
            Some(epic) => format!(
                "[{}]({}) | {} {} | {}",
                epic.key,
                epic.url,
                status_emoji(&epic.status),
                epic.status,
                epic.summary
            ),
            None => STANDALONE_TITLE.to_string(),
        };
        card.add_text_block(header, "Large", "Bolder", true);

        for issue in &group.issues {
            add_issue(&mut card, issue);
        }
    }

    card
}

/// `Story | [PAY-1](url) | 🔄 In Progress | Summary`
fn linked_label(issue: &ReportIssue) -> String {
    format!(
        "{} | [{}]({}) | {} {} | {}",
        issue.issue_type,
        issue.key,
        issue.url,
        status_emoji(&issue.status),
        issue.status,
        issue.summary
    )
}

fn add_issue(card: &mut AdaptiveCard, issue: &ReportIssue) {
    card.add_text_block(linked_label(issue), "Medium", "Bolder", true);

    let mut number = 0;
    for update in &issue.updates {
        number += 1;
        card.add_text_block(format!("{number}. {}", update.sentence()), "Default", "", true);
    }

    for sub_task in &issue.sub_tasks {
        number += 1;
        let mut items = vec![text_block(
            format!("{number}. {}", linked_label(sub_task)),
            "Default",
            "Bolder",
            true,
        )];
        items.extend(
            sub_task
                .updates
                .iter()
                .map(|u| text_block(format!("- {}", u.sentence()), "Default", "", true)),
        );
        card.add_container(items, "Small", "");
    }
}
