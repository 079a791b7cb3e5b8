//! Webhook publishing of a generated report.

use notify::{ChannelError, NotifyChannel, WebhookPayload};
use tracing::info;

use crate::config::WebhookFormat;
use crate::error::ReportError;
use crate::generator::Report;

/// Posts reports through a notification channel in the configured format.
pub struct ReportPublisher<C> {
    channel: C,
    format: WebhookFormat,
}

impl<C: NotifyChannel> ReportPublisher<C> {
    pub fn new(channel: C, format: WebhookFormat) -> Self {
        Self { channel, format }
    }

    /// The payload that would be posted for `report`.
    #[must_use]
    pub fn payload(&self, report: &Report) -> WebhookPayload {
        match self.format {
            WebhookFormat::Card => WebhookPayload::Card(report.card.clone()),
            WebhookFormat::Html => WebhookPayload::Html(report.html.clone()),
        }
    }

    /// Post the report once.
    pub async fn publish(&self, report: &Report) -> Result<(), ReportError> {
        if !self.channel.enabled() {
            return Err(ChannelError::NotConfigured(self.channel.name().to_string()).into());
        }

        self.channel.send(&self.payload(report)).await?;
        info!(
            channel = self.channel.name(),
            format = ?self.format,
            issues = report.document.issue_count(),
            "Report published"
        );
        Ok(())
    }
}
