//! Microsoft Teams notifications.
//!
//! This crate builds AdaptiveCards and delivers them (or plain HTML
//! documents) to Teams incoming webhooks and Workflow webhooks.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{AdaptiveCard, NotifyChannel, TeamsChannel, WebhookPayload};
//!
//! # async fn run() -> Result<(), notify::ChannelError> {
//! let mut card = AdaptiveCard::new();
//! card.add_text_block("Daily Report 15-Jan-2024", "ExtraLarge", "Bolder", true);
//!
//! let channel = TeamsChannel::new("https://example.webhook.office.com/...");
//! channel.send(&WebhookPayload::Card(card)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for notification channels
//! - [`TeamsChannel`] implements Teams webhook delivery
//! - [`card`] holds the AdaptiveCard and Teams message types

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod card;
pub mod channels;
pub mod error;

pub use card::{
    open_url_action, text_block, text_run, AdaptiveCard, CardAction, CardElement, CardInline,
    TeamsMessage,
};
pub use channels::teams::TeamsChannel;
pub use channels::{NotifyChannel, WebhookPayload};
pub use error::ChannelError;
