//! Microsoft Teams webhook notification channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::card::TeamsMessage;
use crate::channels::{NotifyChannel, WebhookPayload};
use crate::error::ChannelError;

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Teams incoming-webhook / Workflow channel.
pub struct TeamsChannel {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

/// Body accepted by Teams Workflow webhooks for HTML content.
#[derive(Debug, Serialize)]
struct HtmlPayload<'a> {
    body: &'a str,
}

impl TeamsChannel {
    /// Create a Teams channel for `webhook_url` with no request deadline.
    /// A blank URL leaves the channel disabled.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self::with_client(webhook_url, reqwest::Client::new())
    }

    /// Create a Teams channel whose post fails once `timeout` elapses.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn with_timeout(
        webhook_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(webhook_url, client))
    }

    fn with_client(webhook_url: impl Into<String>, client: reqwest::Client) -> Self {
        let webhook_url = Some(webhook_url.into()).filter(|u| !u.trim().is_empty());
        if webhook_url.is_none() {
            debug!("Teams notifications disabled (no webhook URL)");
        }

        Self {
            webhook_url,
            client,
        }
    }

    /// Serialize a payload into the JSON body Teams expects.
    fn format_payload(payload: &WebhookPayload) -> Result<serde_json::Value, ChannelError> {
        let value = match payload {
            WebhookPayload::Card(card) => {
                serde_json::to_value(TeamsMessage::from_card(card.clone()))?
            }
            WebhookPayload::Html(html) => serde_json::to_value(HtmlPayload { body: html })?,
        };
        Ok(value)
    }
}

#[async_trait]
impl NotifyChannel for TeamsChannel {
    fn name(&self) -> &'static str {
        "teams"
    }

    fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn send(&self, payload: &WebhookPayload) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured("teams webhook URL".to_string()))?;

        let body = Self::format_payload(payload)?;

        debug!(channel = "teams", "Sending notification");

        let response = self.client.post(webhook_url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(channel = "teams", status = %status, "Notification sent successfully");
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            warn!(channel = "teams", retry_after_secs, "Teams webhook rate limited");
            return Err(ChannelError::RateLimited { retry_after_secs });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            channel = "teams",
            status = %status,
            body = %body,
            "Teams webhook request failed"
        );

        Err(ChannelError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::AdaptiveCard;

    #[test]
    fn test_card_payload_is_teams_message() {
        let mut card = AdaptiveCard::new();
        card.add_text_block("Hello", "", "", true);

        let value = TeamsChannel::format_payload(&WebhookPayload::Card(card)).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(
            value["attachments"][0]["content"]["body"][0]["text"],
            "Hello"
        );
    }

    #[test]
    fn test_html_payload_is_body_field() {
        let value =
            TeamsChannel::format_payload(&WebhookPayload::Html("<h1>Hi</h1>".to_string()))
                .unwrap();
        assert_eq!(value, serde_json::json!({"body": "<h1>Hi</h1>"}));
    }

    #[tokio::test]
    async fn test_unconfigured_channel_errors() {
        let channel = TeamsChannel::new("  ");
        assert!(!channel.enabled());

        let err = channel
            .send(&WebhookPayload::Html(String::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::NotConfigured(_)));
    }
}
