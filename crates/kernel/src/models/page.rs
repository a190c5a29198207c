//! Page model and read operations.
//!
//! Pages form a nested-set tree per language. Each page owns an ordered
//! sequence of elements and is addressable by numeric id or by its
//! `(language_code, urlname)` pair.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Page record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    /// Unique identifier.
    pub id: i64,

    /// Human-readable page name.
    pub name: String,

    /// Slug, unique within its language.
    pub urlname: String,

    /// Layout tag selecting the page's template/shape.
    pub page_layout: String,

    /// Locale this page belongs to.
    pub language_code: String,

    /// Parent page (null for a language root).
    pub parent_id: Option<i64>,

    /// Nested-set left boundary.
    pub lft: i32,

    /// Nested-set right boundary.
    pub rgt: i32,

    /// Tree depth (0 for a language root).
    pub depth: i32,

    /// Restricted pages are visible to authenticated identities only.
    pub restricted: bool,

    /// Publication timestamp (null = never published).
    pub public_on: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PAGE_COLUMNS: &str = "id, name, urlname, page_layout, language_code, parent_id, lft, rgt, depth, restricted, public_on, created_at, updated_at";

impl Page {
    /// Check if this page has been published.
    pub fn is_public(&self) -> bool {
        self.public_on.is_some_and(|t| t <= Utc::now())
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch page by id")?;

        Ok(page)
    }

    /// Find a page by its `(urlname, language_code)` pair.
    pub async fn find_by_urlname(
        pool: &PgPool,
        urlname: &str,
        language_code: &str,
    ) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE urlname = $1 AND language_code = $2"
        ))
        .bind(urlname)
        .bind(language_code)
        .fetch_optional(pool)
        .await
        .context("failed to fetch page by urlname")?;

        Ok(page)
    }

    /// Find the root page of a language tree.
    pub async fn language_root(pool: &PgPool, language_code: &str) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE parent_id IS NULL AND language_code = $1"
        ))
        .bind(language_code)
        .fetch_optional(pool)
        .await
        .context("failed to fetch language root page")?;

        Ok(page)
    }

    /// List pages with optional filters, in tree traversal order.
    pub async fn list_filtered(pool: &PgPool, page_layout: Option<&str>) -> Result<Vec<Self>> {
        let mut query = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE 1=1");

        if page_layout.is_some() {
            query.push_str(" AND page_layout = $1");
        }

        query.push_str(" ORDER BY language_code, lft");

        let mut query_builder = sqlx::query_as::<_, Page>(&query);

        if let Some(layout) = page_layout {
            query_builder = query_builder.bind(layout);
        }

        let pages = query_builder
            .fetch_all(pool)
            .await
            .context("failed to list pages")?;

        Ok(pages)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn page(public_on: Option<DateTime<Utc>>) -> Page {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        Page {
            id: 1,
            name: "Home".to_string(),
            urlname: "index".to_string(),
            page_layout: "standard".to_string(),
            language_code: "en".to_string(),
            parent_id: None,
            lft: 1,
            rgt: 2,
            depth: 0,
            restricted: false,
            public_on,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn public_requires_past_timestamp() {
        assert!(!page(None).is_public());

        let past = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(page(Some(past)).is_public());

        let future = Utc::now() + chrono::Duration::days(30);
        assert!(!page(Some(future)).is_public());
    }
}
