//! Atlassian Document Format (ADF) bodies.
//!
//! Comment and worklog bodies arrive either as a plain string (older
//! endpoints, some integrations) or as an ADF document tree. Anything that
//! fits neither shape is kept verbatim so callers can still show something.

use serde::{Deserialize, Serialize};

/// ADF node type for text leaves.
pub const NODE_TEXT: &str = "text";
/// ADF node type for the document root.
pub const NODE_DOC: &str = "doc";
/// ADF node type for paragraphs.
pub const NODE_PARAGRAPH: &str = "paragraph";

/// A rich-text body as returned by Jira.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Plain string body
    Plain(String),
    /// Structured ADF document
    Document(AdfNode),
    /// Unrecognised JSON, kept as-is
    Other(serde_json::Value),
}

/// One node of an ADF tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<AdfNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<serde_json::Value>,
}

impl AdfNode {
    /// A `text` leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NODE_TEXT.to_string(),
            text: Some(text.into()),
            content: vec![],
            attrs: None,
        }
    }

    /// A container node of the given type.
    pub fn container(kind: impl Into<String>, content: Vec<AdfNode>) -> Self {
        Self {
            kind: kind.into(),
            text: None,
            content,
            attrs: None,
        }
    }

    /// A `doc` root holding one paragraph per string.
    pub fn doc_from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content = paragraphs
            .into_iter()
            .map(|p| Self::container(NODE_PARAGRAPH, vec![Self::text(p)]))
            .collect();
        Self::container(NODE_DOC, content)
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == NODE_TEXT
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<AdfNode> for Body {
    fn from(value: AdfNode) -> Self {
        Self::Document(value)
    }
}
