//! Jira Cloud REST API (v3) client.
//!
//! This crate provides the small slice of the Jira REST API needed to build
//! activity reports:
//!
//! - JQL search (`POST /rest/api/3/search/jql`)
//! - Issue lookup with field projections (`GET /rest/api/3/issue/{key}`)
//! - Saved filters (`GET /rest/api/3/filter/{id}`)
//! - Read-only project lookups (by key, search, recent, all, statuses)
//!
//! # Usage
//!
//! ```no_run
//! use jira::{Credentials, GetIssueOptions, JiraClient, SearchRequest};
//!
//! # async fn run() -> Result<(), jira::JiraError> {
//! let client = JiraClient::new(
//!     "https://your-domain.atlassian.net",
//!     Credentials::basic("me@example.com", "api-token"),
//! )?;
//!
//! let page = client
//!     .search_jql(&SearchRequest::new("project = PROJ ORDER BY updated DESC"))
//!     .await?;
//!
//! for issue in &page.issues {
//!     let full = client
//!         .get_issue(&issue.key, &GetIssueOptions::fields(["summary", "comment"]))
//!         .await?;
//!     println!("{} {}", full.key, full.fields.summary);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The [`IssueRepository`] trait is the seam consumers depend on; [`JiraClient`]
//! is the HTTP implementation.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adf;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod repository;

pub use adf::{AdfNode, Body};
pub use auth::Credentials;
pub use client::{JiraClient, DEFAULT_MAX_RESULTS, MAX_RESULTS};
pub use error::JiraError;
pub use models::{
    browse_url, Comment, CommentPage, Filter, GetIssueOptions, Issue, IssueFields, IssueType,
    IssueTypeStatuses, ParentFields, ParentRef, Project, ProjectListOptions, ProjectPage,
    SearchRequest, SearchResponse, Status, User, Worklog, WorklogPage,
};
pub use repository::IssueRepository;

/// Issue type name Jira uses for epics.
pub const EPIC_ISSUE_TYPE: &str = "Epic";
