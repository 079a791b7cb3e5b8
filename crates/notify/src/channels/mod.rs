//! Notification channel implementations.

pub mod teams;

use async_trait::async_trait;

use crate::card::AdaptiveCard;
use crate::error::ChannelError;

/// What a channel delivers.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookPayload {
    /// An AdaptiveCard, wrapped in a Teams message envelope
    Card(AdaptiveCard),
    /// An HTML document, posted as `{"body": html}` for Teams Workflow webhooks
    Html(String),
}

/// Trait for notification channels.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Check if this channel is enabled/configured.
    fn enabled(&self) -> bool;

    /// Deliver a payload. One attempt, no retry.
    async fn send(&self, payload: &WebhookPayload) -> Result<(), ChannelError>;
}
