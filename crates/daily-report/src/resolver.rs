//! Epic → Task/Story → Subtask hierarchy resolution.
//!
//! The search returns a flat list of issues. Each freshly updated issue is
//! placed either under an epic group, in the standalone bucket, or nested
//! below its parent task. Parents and grandparents outside the search result
//! are fetched on demand; a parent fetched only to host a subtask is shown
//! even without activity of its own. Every key is placed at most once.
//!
//! Lookups run one at a time. A failed ancestor lookup never fails the run:
//! the issue falls back to the standalone bucket.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use jira::{GetIssueOptions, Issue, IssueRepository, JiraError};
use tracing::{debug, info, warn};

use crate::extract::{extract_updates, issue_update};
use crate::model::{EpicGroup, IssueUpdate};

/// Fields requested when only the position in the hierarchy matters.
pub const ANCESTOR_FIELDS: [&str; 4] = ["issuetype", "status", "summary", "parent"];

/// Fields requested when an ancestor's own activity is needed.
pub const ACTIVITY_FIELDS: [&str; 6] = [
    "summary",
    "status",
    "issuetype",
    "parent",
    "comment",
    "worklog",
];

/// Output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Epic groups by epic key
    pub epic_groups: BTreeMap<String, EpicGroup>,
    /// Top-level issues outside any epic
    pub standalone: Vec<IssueUpdate>,
}

impl Resolution {
    /// Every placed issue, including nested subtasks.
    pub fn all_issues(&self) -> impl Iterator<Item = &IssueUpdate> {
        self.epic_groups
            .values()
            .flat_map(|g| g.issues.iter())
            .chain(self.standalone.iter())
            .flat_map(IssueUpdate::walk)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.epic_groups.is_empty() && self.standalone.is_empty()
    }
}

/// Epic header plus the keys of its direct issues, in placement order.
#[derive(Debug)]
struct EpicSlot {
    summary: String,
    status: String,
    url: String,
    issue_keys: Vec<String>,
}

impl EpicSlot {
    fn new(epic: &Issue, host: &str) -> Self {
        Self {
            summary: epic.fields.summary.clone(),
            status: epic.fields.status.name.clone(),
            url: epic.browse_url(host),
            issue_keys: vec![],
        }
    }
}

/// Single-use resolver; all state lives on the instance and dies with it.
pub struct Resolver<'a> {
    repository: &'a dyn IssueRepository,
    host: String,
    lookback: DateTime<Utc>,
    now: DateTime<Utc>,
    /// Every issue turned into a node so far, by key
    nodes: HashMap<String, IssueUpdate>,
    /// Subtask keys per parent key
    children: HashMap<String, Vec<String>>,
    epics: BTreeMap<String, EpicSlot>,
    standalone: Vec<String>,
    /// Successful minimal-projection lookups
    ancestors: HashMap<String, Issue>,
}

impl<'a> Resolver<'a> {
    /// `host` builds browse URLs; updates at or before `lookback` are ignored;
    /// `now` stamps ancestors that carry no activity of their own.
    pub fn new(
        repository: &'a dyn IssueRepository,
        host: impl Into<String>,
        lookback: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            repository,
            host: host.into(),
            lookback,
            now,
            nodes: HashMap::new(),
            children: HashMap::new(),
            epics: BTreeMap::new(),
            standalone: vec![],
            ancestors: HashMap::new(),
        }
    }

    /// Resolve the search result into epic groups and standalone issues.
    pub async fn resolve(mut self, issues: &[Issue]) -> Resolution {
        for issue in issues {
            self.process(issue).await;
        }

        let resolution = self.finish();
        info!(
            epics = resolution.epic_groups.len(),
            standalone = resolution.standalone.len(),
            issues = resolution.all_issues().count(),
            "Resolved issue hierarchy"
        );
        resolution
    }

    async fn process(&mut self, issue: &Issue) {
        if self.is_added(&issue.key) {
            debug!(issue = %issue.key, "Already in report, skipping");
            return;
        }

        let extraction = extract_updates(issue, self.lookback);
        if extraction.updates.is_empty() {
            debug!(issue = %issue.key, "No recent updates, skipping");
            return;
        }
        self.nodes.insert(
            issue.key.clone(),
            issue_update(issue, &self.host, extraction),
        );

        let Some(parent_key) = issue.parent_key() else {
            self.place(&issue.key, None);
            return;
        };

        let parent = match self.lookup(parent_key).await {
            Ok(parent) => parent,
            Err(e) => {
                warn!(
                    issue = %issue.key,
                    parent = %parent_key,
                    error = %e,
                    "Parent lookup failed, placing issue standalone"
                );
                self.place(&issue.key, None);
                return;
            }
        };

        if parent.is_epic() {
            self.place(&issue.key, Some(&parent));
            return;
        }

        let epic = self.epic_of(&parent).await;
        self.attach_subtask(&issue.key, parent_key, epic.as_ref()).await;
    }

    /// Nest a subtask under its parent, synthesizing the parent if needed.
    async fn attach_subtask(&mut self, subtask_key: &str, parent_key: &str, epic: Option<&Issue>) {
        if !self.nodes.contains_key(parent_key) {
            let options = GetIssueOptions::fields(ACTIVITY_FIELDS);
            match self.repository.get_issue(parent_key, &options).await {
                Ok(parent) => {
                    let extraction = extract_updates(&parent, self.lookback);
                    let mut node = issue_update(&parent, &self.host, extraction);
                    if !node.has_updates() {
                        node.last_updated = self.now;
                    }
                    debug!(
                        parent = %parent_key,
                        subtask = %subtask_key,
                        own_updates = node.updates.len(),
                        "Pulled in parent for subtask"
                    );
                    self.nodes.insert(parent_key.to_string(), node);
                }
                Err(e) => {
                    warn!(
                        issue = %subtask_key,
                        parent = %parent_key,
                        error = %e,
                        "Parent fetch failed, placing subtask standalone"
                    );
                    self.place(subtask_key, None);
                    return;
                }
            }
        }

        self.children
            .entry(parent_key.to_string())
            .or_default()
            .push(subtask_key.to_string());
        self.place(parent_key, epic);

        if let Some(node) = self.nodes.get_mut(subtask_key) {
            node.added_to_report = true;
        }
    }

    /// The epic owning a Task/Story, if its parent is one.
    async fn epic_of(&mut self, parent: &Issue) -> Option<Issue> {
        let grandparent_key = parent.parent_key()?;
        match self.lookup(grandparent_key).await {
            Ok(grandparent) if grandparent.is_epic() => Some(grandparent),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    issue = %parent.key,
                    parent = %grandparent_key,
                    error = %e,
                    "Grandparent lookup failed, treating as no epic"
                );
                None
            }
        }
    }

    /// Minimal-projection lookup, memoized for the run.
    async fn lookup(&mut self, key: &str) -> Result<Issue, JiraError> {
        if let Some(hit) = self.ancestors.get(key) {
            return Ok(hit.clone());
        }

        let options = GetIssueOptions::fields(ANCESTOR_FIELDS);
        let issue = self.repository.get_issue(key, &options).await?;
        self.ancestors.insert(key.to_string(), issue.clone());
        Ok(issue)
    }

    /// Put a node at top level (epic group or standalone) once.
    fn place(&mut self, key: &str, epic: Option<&Issue>) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if node.added_to_report {
            return;
        }
        node.added_to_report = true;

        match epic {
            Some(epic) => {
                let host = &self.host;
                self.epics
                    .entry(epic.key.clone())
                    .or_insert_with(|| EpicSlot::new(epic, host))
                    .issue_keys
                    .push(key.to_string());
            }
            None => self.standalone.push(key.to_string()),
        }
    }

    fn is_added(&self, key: &str) -> bool {
        self.nodes.get(key).is_some_and(|n| n.added_to_report)
    }

    fn finish(mut self) -> Resolution {
        let epics = std::mem::take(&mut self.epics);
        let epic_groups = epics
            .into_iter()
            .map(|(key, slot)| {
                let issues = slot
                    .issue_keys
                    .iter()
                    .filter_map(|k| self.take_node(k))
                    .collect();
                let group = EpicGroup {
                    key: key.clone(),
                    summary: slot.summary,
                    status: slot.status,
                    url: slot.url,
                    issues,
                };
                (key, group)
            })
            .collect();

        let standalone_keys = std::mem::take(&mut self.standalone);
        let standalone = standalone_keys
            .iter()
            .filter_map(|k| self.take_node(k))
            .collect();

        Resolution {
            epic_groups,
            standalone,
        }
    }

    /// Remove a node and its subtasks from the index as one subtree.
    fn take_node(&mut self, key: &str) -> Option<IssueUpdate> {
        let mut node = self.nodes.remove(key)?;
        for child in self.children.remove(key).unwrap_or_default() {
            if let Some(sub_task) = self.take_node(&child) {
                node.sub_tasks.push(sub_task);
            }
        }
        Some(node)
    }
}
