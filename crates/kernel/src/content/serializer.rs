//! Element serialization to JSON-safe records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::content::essence;
use crate::models::{Content, Element};

/// JSON-safe representation of one element.
///
/// `content_ids` and `ingredients` are index-aligned: the ingredient at
/// position `i` is the serialized essence of the content at position `i`.
/// Nested children are never folded in here; they are exposed separately
/// as a `nested_elements` relation on tree output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementJson {
    pub id: i64,
    pub name: String,
    pub position: i32,
    pub page_id: i64,
    pub cell_id: Option<i64>,
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub content_ids: Vec<i64>,
    pub ingredients: Vec<serde_json::Value>,
}

/// Serialize one element with its own contents.
///
/// `contents` must be the element's own contents in position order; nested
/// elements' contents never appear here. Pure transform: a content whose
/// essence fails to render is replaced with an error marker at its index,
/// leaving siblings and the element itself untouched.
pub fn serialize_element(element: &Element, contents: &[Content]) -> ElementJson {
    let mut content_ids = Vec::with_capacity(contents.len());
    let mut ingredients = Vec::with_capacity(contents.len());

    for content in contents {
        content_ids.push(content.id);
        match essence::ingredient(content) {
            Ok(value) => ingredients.push(value),
            Err(e) => {
                warn!(
                    content_id = content.id,
                    element_id = element.id,
                    error = %e,
                    "failed to serialize ingredient"
                );
                ingredients.push(e.marker());
            }
        }
    }

    ElementJson {
        id: element.id,
        name: element.name.clone(),
        position: element.position,
        page_id: element.page_id,
        cell_id: element.cell_id,
        tag_list: element.tag_list.clone(),
        created_at: element.created_at,
        updated_at: element.updated_at,
        content_ids,
        ingredients,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn element() -> Element {
        Element {
            id: 10,
            name: "header".to_string(),
            page_id: 1,
            cell_id: Some(2),
            parent_element_id: None,
            position: 1,
            public: true,
            tag_list: vec!["hero".to_string()],
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn content(id: i64, position: i32, essence: Option<serde_json::Value>) -> Content {
        Content {
            id,
            name: format!("content_{id}"),
            element_id: 10,
            position,
            essence,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[test]
    fn content_ids_and_ingredients_are_index_aligned() {
        let contents = vec![
            content(1, 1, Some(json!({"type": "text", "body": "One"}))),
            content(2, 2, Some(json!({"type": "boolean", "value": true}))),
            content(3, 3, Some(json!({"type": "select", "value": "blue"}))),
        ];

        let serialized = serialize_element(&element(), &contents);

        assert_eq!(serialized.content_ids, vec![1, 2, 3]);
        assert_eq!(serialized.ingredients.len(), serialized.content_ids.len());
        assert_eq!(serialized.ingredients[0], json!("One"));
        assert_eq!(serialized.ingredients[1], json!(true));
        assert_eq!(serialized.ingredients[2], json!("blue"));
    }

    #[test]
    fn failed_ingredient_does_not_abort_siblings() {
        let contents = vec![
            content(1, 1, Some(json!({"type": "text", "body": "Before"}))),
            content(2, 2, None),
            content(3, 3, Some(json!({"type": "text", "body": "After"}))),
        ];

        let serialized = serialize_element(&element(), &contents);

        assert_eq!(serialized.ingredients[0], json!("Before"));
        assert_eq!(
            serialized.ingredients[1],
            json!({"error": "content 2 has no essence"})
        );
        assert_eq!(serialized.ingredients[2], json!("After"));
    }

    #[test]
    fn serialization_is_idempotent() {
        let contents = vec![content(
            1,
            1,
            Some(json!({"type": "richtext", "body": "<p>Hi</p>", "stripped_body": "Hi"})),
        )];

        let first = serde_json::to_string(&serialize_element(&element(), &contents)).unwrap();
        let second = serde_json::to_string(&serialize_element(&element(), &contents)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_element_serializes_empty_sequences() {
        let serialized = serialize_element(&element(), &[]);
        assert!(serialized.content_ids.is_empty());
        assert!(serialized.ingredients.is_empty());
    }
}
