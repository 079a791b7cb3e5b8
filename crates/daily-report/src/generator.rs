//! End-to-end report generation: query → search → resolve → assemble → render.

use chrono::{DateTime, Utc};
use jira::{IssueRepository, SearchRequest};
use notify::AdaptiveCard;
use tracing::{debug, info, instrument};

use crate::assemble::{assemble, QuerySource, ReportDocument};
use crate::config::{OutputFormat, QueryMode, ReportConfig};
use crate::error::ReportError;
use crate::render;
use crate::resolver::Resolver;

/// Fields requested from the search endpoint.
pub const SEARCH_FIELDS: [&str; 8] = [
    "summary",
    "status",
    "issuetype",
    "parent",
    "updated",
    "created",
    "comment",
    "worklog",
];

/// A generated report in every output format.
#[derive(Debug, Clone)]
pub struct Report {
    pub document: ReportDocument,
    pub markdown: String,
    pub html: String,
    pub card: AdaptiveCard,
}

impl Report {
    /// Render all formats from one document.
    #[must_use]
    pub fn from_document(document: ReportDocument) -> Self {
        Self {
            markdown: render::markdown::render(&document),
            html: render::html::render(&document),
            card: render::card::render(&document),
            document,
        }
    }

    /// The report as printed in `format`.
    pub fn output(&self, format: OutputFormat) -> Result<String, ReportError> {
        match format {
            OutputFormat::Markdown => Ok(self.markdown.clone()),
            OutputFormat::Html => Ok(self.html.clone()),
            OutputFormat::Card => serde_json::to_string_pretty(&self.card)
                .map_err(|e| ReportError::Generate(format!("failed to serialize card: {e}"))),
        }
    }
}

/// Builds reports from one issue repository.
pub struct Generator<R> {
    repository: R,
    config: ReportConfig,
}

impl<R: IssueRepository> Generator<R> {
    pub fn new(repository: R, config: ReportConfig) -> Self {
        Self { repository, config }
    }

    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate the report for the current time.
    pub async fn generate(&self) -> Result<Report, ReportError> {
        self.generate_at(Utc::now()).await
    }

    /// Generate the report as of `now`.
    ///
    /// Fails only when the query cannot be built or the search itself fails;
    /// ancestor lookup failures degrade placement instead.
    #[instrument(skip(self), fields(query = ?self.config.query))]
    pub async fn generate_at(&self, now: DateTime<Utc>) -> Result<Report, ReportError> {
        let (jql, source) = self.query().await?;

        let request = SearchRequest::new(jql)
            .max_results(self.config.max_results)
            .fields(SEARCH_FIELDS);
        info!(jql = %request.jql, "Searching Jira");

        let response = self
            .repository
            .search(&request)
            .await
            .map_err(ReportError::Search)?;
        info!(
            issues = response.issues.len(),
            total = ?response.total,
            "Search complete"
        );
        if !response.is_last {
            debug!("Search has further pages; reporting the first page only");
        }

        let lookback = self.config.lookback_from(now);
        let resolution = Resolver::new(&self.repository, &self.config.jira_host, lookback, now)
            .resolve(&response.issues)
            .await;

        let document = assemble(resolution, now, &self.config.timezone, &source);
        info!(
            groups = document.groups.len(),
            issues = document.issue_count(),
            "Report assembled"
        );
        Ok(Report::from_document(document))
    }

    /// JQL for the configured query mode plus its subtitle source.
    async fn query(&self) -> Result<(String, QuerySource), ReportError> {
        match &self.config.query {
            QueryMode::ProjectHours { project } => {
                let hours = self.config.lookback_hours;
                Ok((
                    project_hours_jql(project, hours),
                    QuerySource::ProjectHours {
                        project: project.clone(),
                        hours,
                    },
                ))
            }
            QueryMode::CustomJql(jql) => Ok((jql.clone(), QuerySource::CustomJql(jql.clone()))),
            QueryMode::Filter { id } => {
                let filter = self
                    .repository
                    .get_filter(id)
                    .await
                    .map_err(ReportError::Search)?;
                if filter.jql.trim().is_empty() {
                    return Err(ReportError::Generate(format!("filter {id} has no JQL")));
                }
                debug!(filter = %id, name = %filter.name, "Resolved saved filter");
                Ok((
                    filter.jql,
                    QuerySource::Filter {
                        id: id.clone(),
                        name: filter.name,
                    },
                ))
            }
        }
    }
}

/// `project = {project} AND updated >= -{hours}h ORDER BY updated DESC`
#[must_use]
pub fn project_hours_jql(project: &str, hours: u32) -> String {
    format!("project = {project} AND updated >= -{hours}h ORDER BY updated DESC")
}
