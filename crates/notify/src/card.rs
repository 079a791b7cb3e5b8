//! AdaptiveCard payloads for Microsoft Teams.

use serde::{Deserialize, Serialize};

/// Schema URL stamped on every card.
pub const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";

/// Card schema version Teams renders reliably.
pub const ADAPTIVE_CARD_VERSION: &str = "1.5";

/// Attachment content type for AdaptiveCards in a Teams message.
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// A complete AdaptiveCard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveCard {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub body: Vec<CardElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msteams: Option<TeamsProperties>,
}

/// Teams-specific card properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsProperties {
    pub width: String,
}

/// Any body element: `TextBlock`, `RichTextBlock` or `Container`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub separator: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CardElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CardAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Runs of a `RichTextBlock`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inlines: Vec<CardInline>,
}

/// A card action, e.g. `Action.OpenUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Inline content of a `RichTextBlock`, e.g. a `TextRun`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInline {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl Default for AdaptiveCard {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveCard {
    /// An empty full-width card.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: "AdaptiveCard".to_string(),
            schema: ADAPTIVE_CARD_SCHEMA.to_string(),
            version: ADAPTIVE_CARD_VERSION.to_string(),
            body: vec![],
            msteams: Some(TeamsProperties {
                width: "Full".to_string(),
            }),
        }
    }

    /// Append a `TextBlock`. Empty `size`/`weight` leave the host defaults.
    pub fn add_text_block(
        &mut self,
        text: impl Into<String>,
        size: &str,
        weight: &str,
        wrap: bool,
    ) {
        self.body.push(text_block(text, size, weight, wrap));
    }

    /// Append a `RichTextBlock` made of `inlines`.
    pub fn add_rich_text_block(
        &mut self,
        inlines: Vec<CardInline>,
        spacing: &str,
        separator: bool,
    ) {
        self.body.push(CardElement {
            kind: "RichTextBlock".to_string(),
            inlines,
            spacing: non_empty(spacing),
            separator,
            ..CardElement::default()
        });
    }

    /// Append a `Container` holding `items`.
    pub fn add_container(&mut self, items: Vec<CardElement>, spacing: &str, style: &str) {
        self.body.push(CardElement {
            kind: "Container".to_string(),
            items,
            spacing: non_empty(spacing),
            style: non_empty(style),
            ..CardElement::default()
        });
    }

    /// Text of every `TextBlock` in body order, descending into containers.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        fn walk<'a>(elements: &'a [CardElement], out: &mut Vec<&'a str>) {
            for element in elements {
                if let Some(text) = element.text.as_deref() {
                    out.push(text);
                }
                walk(&element.items, out);
            }
        }

        let mut out = vec![];
        walk(&self.body, &mut out);
        out
    }
}

/// A standalone `TextBlock`, e.g. for use inside a container.
#[must_use]
pub fn text_block(text: impl Into<String>, size: &str, weight: &str, wrap: bool) -> CardElement {
    CardElement {
        kind: "TextBlock".to_string(),
        text: Some(text.into()),
        size: non_empty(size),
        weight: non_empty(weight),
        wrap,
        ..CardElement::default()
    }
}

/// A `TextRun` for a `RichTextBlock`. Empty `weight`/`color` are omitted.
#[must_use]
pub fn text_run(text: impl Into<String>, weight: &str, color: &str) -> CardInline {
    CardInline {
        kind: "TextRun".to_string(),
        text: Some(text.into()),
        weight: non_empty(weight),
        color: non_empty(color),
        ..CardInline::default()
    }
}

/// An `Action.OpenUrl` button.
#[must_use]
pub fn open_url_action(title: impl Into<String>, url: impl Into<String>) -> CardAction {
    CardAction {
        kind: "Action.OpenUrl".to_string(),
        title: Some(title.into()),
        url: Some(url.into()),
    }
}

/// The message envelope Teams incoming webhooks accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub attachments: Vec<Attachment>,
}

/// One message attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: AdaptiveCard,
}

impl TeamsMessage {
    /// Wrap a card as the single attachment of a message.
    #[must_use]
    pub fn from_card(card: AdaptiveCard) -> Self {
        Self {
            kind: "message".to_string(),
            attachments: vec![Attachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
                content: card,
            }],
        }
    }
}
