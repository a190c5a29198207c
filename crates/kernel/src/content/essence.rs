//! Typed essence values and their JSON-safe serialization.
//!
//! Each content references exactly one essence, stored as a tagged JSON
//! object. The essence set is closed: unknown kinds fail with an
//! [`IngredientError`] instead of a generic crash, and a missing essence is
//! reported distinctly from an intentionally blank value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::models::Content;

/// Essence kinds the kernel can serialize. Must match the serde tags of
/// [`Essence`].
const KNOWN_KINDS: &[&str] = &[
    "text", "richtext", "html", "date", "boolean", "select", "link", "picture", "file",
];

/// A typed value container attached to a content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Essence {
    Text {
        #[serde(default)]
        body: String,
    },
    Richtext {
        #[serde(default)]
        body: String,
        #[serde(default)]
        stripped_body: String,
    },
    Html {
        #[serde(default)]
        source: String,
    },
    Date {
        date: DateTime<Utc>,
    },
    Boolean {
        #[serde(default)]
        value: bool,
    },
    Select {
        #[serde(default)]
        value: String,
    },
    Link {
        #[serde(default)]
        url: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        target: String,
    },
    Picture {
        picture_id: Option<i64>,
        #[serde(default)]
        caption: String,
        #[serde(default)]
        alt_tag: String,
    },
    File {
        file_id: Option<i64>,
        #[serde(default)]
        title: String,
    },
}

/// Failure to render one content's essence to a JSON-safe value.
///
/// Isolated per content: the surrounding element and sibling contents still
/// serialize; the failing ingredient is replaced with an error marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngredientError {
    /// The content row has no essence at all: a data-integrity defect,
    /// not a blank field.
    #[error("content {id} has no essence")]
    Missing { id: i64 },

    #[error("content {id} has unknown essence kind '{kind}'")]
    UnknownKind { id: i64, kind: String },

    #[error("content {id} essence is malformed: {reason}")]
    Malformed { id: i64, reason: String },
}

impl IngredientError {
    /// In-band marker emitted in place of the failed ingredient.
    pub fn marker(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl Essence {
    /// Parse a stored essence payload.
    pub fn parse(content_id: i64, raw: &Value) -> Result<Self, IngredientError> {
        let Some(object) = raw.as_object() else {
            return Err(IngredientError::Malformed {
                id: content_id,
                reason: "essence is not a JSON object".to_string(),
            });
        };

        let Some(kind) = object.get("type").and_then(|v| v.as_str()) else {
            return Err(IngredientError::Malformed {
                id: content_id,
                reason: "essence has no type tag".to_string(),
            });
        };

        if !KNOWN_KINDS.contains(&kind) {
            return Err(IngredientError::UnknownKind {
                id: content_id,
                kind: kind.to_string(),
            });
        }

        serde_json::from_value(raw.clone()).map_err(|e| IngredientError::Malformed {
            id: content_id,
            reason: e.to_string(),
        })
    }

    /// Serialize to a JSON-safe scalar or object.
    pub fn to_json_value(&self) -> Value {
        match self {
            Essence::Text { body } => json!(body),
            Essence::Richtext {
                body,
                stripped_body,
            } => json!({ "body": body, "stripped_body": stripped_body }),
            Essence::Html { source } => json!(source),
            Essence::Date { date } => json!(date.to_rfc3339()),
            Essence::Boolean { value } => json!(value),
            Essence::Select { value } => json!(value),
            Essence::Link { url, title, target } => {
                json!({ "url": url, "title": title, "target": target })
            }
            Essence::Picture {
                picture_id,
                caption,
                alt_tag,
            } => json!({ "picture_id": picture_id, "caption": caption, "alt_tag": alt_tag }),
            Essence::File { file_id, title } => json!({ "file_id": file_id, "title": title }),
        }
    }
}

/// Render a content's ingredient, the JSON-safe value of its essence.
pub fn ingredient(content: &Content) -> Result<Value, IngredientError> {
    let Some(raw) = content.essence.as_ref() else {
        return Err(IngredientError::Missing { id: content.id });
    };

    Ok(Essence::parse(content.id, raw)?.to_json_value())
}
