//! Daily Jira activity reports.
//!
//! This crate provides:
//! - Recent comment and worklog extraction per issue
//! - Epic → Task/Story → Subtask hierarchy resolution with on-demand ancestor lookups
//! - Report assembly ordered by epic key and recency
//! - Markdown, HTML and Teams AdaptiveCard renderers
//! - Publishing to a Teams webhook
//!
//! # Usage
//!
//! ```no_run
//! use clap::Parser;
//! use daily_report::{Generator, ReportArgs};
//! use jira::JiraClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ReportArgs::parse().into_config()?;
//! let client = JiraClient::with_timeout(
//!     config.jira_host.clone(),
//!     config.credentials.clone(),
//!     config.timeout,
//! )?;
//!
//! let report = Generator::new(client, config).generate().await?;
//! println!("{}", report.markdown);
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod model;
pub mod publisher;
pub mod render;
pub mod resolver;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use assemble::{
    assemble, truncate, QuerySource, ReportDocument, ReportGroup, ReportIssue, UpdateLine,
};
pub use config::{OutputFormat, QueryMode, QueryType, ReportArgs, ReportConfig, WebhookFormat};
pub use error::{ConfigError, ReportError};
pub use extract::{extract_updates, Extraction};
pub use generator::{Generator, Report};
pub use model::{EpicGroup, IssueUpdate, Update, UpdateKind};
pub use publisher::ReportPublisher;
pub use resolver::{Resolution, Resolver};
