//! Element model and read operations.
//!
//! Elements are the content building blocks placed on a page. An element's
//! `name` references an [`ElementDefinition`]; only nestable definitions may
//! own child elements (`parent_element_id` points at the owner). Elements
//! without a parent are "not nested" and form the first level of a page.
//!
//! [`ElementDefinition`]: crate::content::ElementDefinition

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Element record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Element {
    /// Unique identifier.
    pub id: i64,

    /// Definition name describing this element's shape.
    pub name: String,

    /// Owning page.
    pub page_id: i64,

    /// Optional named placement slot on the page.
    pub cell_id: Option<i64>,

    /// Owning element when nested (null = not nested).
    pub parent_element_id: Option<i64>,

    /// Sibling order, unique within the parent scope.
    pub position: i32,

    /// Whether the element is publicly visible.
    pub public: bool,

    /// Free-form tags.
    pub tag_list: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const ELEMENT_COLUMNS: &str = "id, name, page_id, cell_id, parent_element_id, position, public, tag_list, created_at, updated_at";

impl Element {
    /// Check if this element is a nested child of another element.
    pub fn is_nested(&self) -> bool {
        self.parent_element_id.is_some()
    }

    /// Find an element by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let element = sqlx::query_as::<_, Element>(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch element by id")?;

        Ok(element)
    }

    /// List not-nested elements with optional filters.
    ///
    /// Filters are conjunctive; an absent filter imposes no constraint.
    pub async fn list_filtered(
        pool: &PgPool,
        page_id: Option<i64>,
        named: &[String],
    ) -> Result<Vec<Self>> {
        let mut query = format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements WHERE parent_element_id IS NULL"
        );
        let mut param_idx = 1;

        if page_id.is_some() {
            query.push_str(&format!(" AND page_id = ${param_idx}"));
            param_idx += 1;
        }
        if !named.is_empty() {
            query.push_str(&format!(" AND name = ANY(${param_idx})"));
        }

        query.push_str(" ORDER BY page_id, position");

        let mut query_builder = sqlx::query_as::<_, Element>(&query);

        if let Some(p) = page_id {
            query_builder = query_builder.bind(p);
        }
        if !named.is_empty() {
            query_builder = query_builder.bind(named.to_vec());
        }

        let elements = query_builder
            .fetch_all(pool)
            .await
            .context("failed to list elements")?;

        Ok(elements)
    }

    /// List every element of a page (nested included), parents before
    /// children, siblings in position order.
    pub async fn list_for_page(pool: &PgPool, page_id: i64) -> Result<Vec<Self>> {
        let elements = sqlx::query_as::<_, Element>(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements WHERE page_id = $1 ORDER BY parent_element_id NULLS FIRST, position"
        ))
        .bind(page_id)
        .fetch_all(pool)
        .await
        .context("failed to list elements for page")?;

        Ok(elements)
    }
}
