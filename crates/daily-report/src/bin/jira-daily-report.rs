//! jira-daily-report - post a daily digest of Jira activity to Microsoft Teams.
//!
//! Searches Jira, groups recently commented or worklogged issues under their
//! epics and parents, prints the report to stdout and posts it to a Teams
//! webhook.
//!
//! # Environment Variables
//!
//! - `JIRA_HOST` - Jira site URL (required)
//! - `JIRA_USERNAME` - account email; omit to use `JIRA_PASSWORD` as a bearer token
//! - `JIRA_PASSWORD` - API token or password (required)
//! - `QUERY_TYPE` - `project-hours` (default), `custom-jql` or `filter`
//! - `JIRA_PROJECT` / `CUSTOM_JQL` / `FILTER_ID` - input for the selected query type
//! - `LOOKBACK_HOURS` - activity window (default 24)
//! - `REPORT_TIMEZONE` - IANA timezone for times in the report (default UTC)
//! - `WEBHOOK_URL` - Teams webhook (required)
//! - `WEBHOOK_FORMAT` - `card` (default) or `html`
//!
//! # Examples
//!
//! ```bash
//! # Last 24 hours of project PAY, printed only
//! jira-daily-report --jira-project PAY --dry-run
//!
//! # Saved filter, posted as HTML to a Workflow webhook
//! jira-daily-report --query-type filter --filter-id 10042 --webhook-format html
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use jira::JiraClient;
use notify::TeamsChannel;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daily_report::{Generator, ReportArgs, ReportPublisher};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ReportArgs::parse();

    // Logs go to stderr; stdout carries only the report
    let filter = if args.verbose {
        EnvFilter::new("daily_report=debug,jira=debug,notify=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("daily_report=info,warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = args.into_config().context("Invalid configuration")?;
    let client = JiraClient::with_timeout(
        config.jira_host.clone(),
        config.credentials.clone(),
        config.timeout,
    )
    .context("Failed to create Jira client")?;

    let output = config.output;
    let dry_run = config.dry_run;
    let channel = TeamsChannel::with_timeout(config.webhook_url.clone(), config.timeout)
        .context("Failed to create Teams channel")?;
    let publisher = ReportPublisher::new(channel, config.webhook_format);

    let generator = Generator::new(client, config);
    let report = generator
        .generate()
        .await
        .context("Failed to generate report")?;

    println!("{}", report.output(output)?);

    if dry_run {
        tracing::info!("Dry run, skipping webhook");
        return Ok(());
    }

    publisher
        .publish(&report)
        .await
        .context("Failed to publish report")?;

    Ok(())
}
