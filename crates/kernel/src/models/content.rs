//! Content model and read operations.
//!
//! A content attaches one typed essence value to an element. The essence is
//! stored as a tagged JSONB object (`{"type": "text", "body": "..."}`); a
//! NULL essence is a data-integrity defect, not an intentionally blank field.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Content record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Content {
    /// Unique identifier.
    pub id: i64,

    /// Role of this content within its element (e.g. "headline").
    pub name: String,

    /// Owning element.
    pub element_id: i64,

    /// Order within the element.
    pub position: i32,

    /// Tagged essence payload (null = integrity defect).
    pub essence: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const CONTENT_COLUMNS: &str = "id, name, element_id, position, essence, created_at, updated_at";

impl Content {
    /// Find a content by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let content = sqlx::query_as::<_, Content>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch content by id")?;

        Ok(content)
    }

    /// List the contents of a set of elements, in element and position order.
    pub async fn list_for_elements(pool: &PgPool, element_ids: &[i64]) -> Result<Vec<Self>> {
        let contents = sqlx::query_as::<_, Content>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE element_id = ANY($1) ORDER BY element_id, position"
        ))
        .bind(element_ids.to_vec())
        .fetch_all(pool)
        .await
        .context("failed to list contents for elements")?;

        Ok(contents)
    }
}
