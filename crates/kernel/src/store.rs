//! Content store interface.
//!
//! The persisted schema belongs to an external content-management layer;
//! the kernel only reads it. The trait seam lets integration tests run the
//! real query pipeline against an in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::content::{ElementFilters, PageFilters};
use crate::db;
use crate::models::{Content, Element, Page};

/// Read-only access to the page/element/content store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Find a page by id.
    async fn find_page(&self, id: i64) -> Result<Option<Page>>;

    /// Find a page by its `(urlname, language_code)` pair.
    async fn find_page_by_urlname(&self, urlname: &str, language_code: &str)
    -> Result<Option<Page>>;

    /// Find the root page of a language tree.
    async fn language_root(&self, language_code: &str) -> Result<Option<Page>>;

    /// List pages matching the filters, in tree traversal order.
    async fn list_pages(&self, filters: &PageFilters) -> Result<Vec<Page>>;

    /// Find an element by id.
    async fn find_element(&self, id: i64) -> Result<Option<Element>>;

    /// List not-nested elements matching the filters.
    async fn list_elements(&self, filters: &ElementFilters) -> Result<Vec<Element>>;

    /// List every element of a page, parents before children.
    async fn elements_for_page(&self, page_id: i64) -> Result<Vec<Element>>;

    /// List the contents of a set of elements, in position order.
    async fn contents_for_elements(&self, element_ids: &[i64]) -> Result<Vec<Content>>;

    /// Check if the store is reachable.
    async fn healthy(&self) -> bool;
}

/// Postgres-backed content store.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn find_page(&self, id: i64) -> Result<Option<Page>> {
        Page::find_by_id(&self.pool, id).await
    }

    async fn find_page_by_urlname(
        &self,
        urlname: &str,
        language_code: &str,
    ) -> Result<Option<Page>> {
        Page::find_by_urlname(&self.pool, urlname, language_code).await
    }

    async fn language_root(&self, language_code: &str) -> Result<Option<Page>> {
        Page::language_root(&self.pool, language_code).await
    }

    async fn list_pages(&self, filters: &PageFilters) -> Result<Vec<Page>> {
        Page::list_filtered(&self.pool, filters.page_layout.as_deref()).await
    }

    async fn find_element(&self, id: i64) -> Result<Option<Element>> {
        Element::find_by_id(&self.pool, id).await
    }

    async fn list_elements(&self, filters: &ElementFilters) -> Result<Vec<Element>> {
        Element::list_filtered(&self.pool, filters.page_id, &filters.named).await
    }

    async fn elements_for_page(&self, page_id: i64) -> Result<Vec<Element>> {
        Element::list_for_page(&self.pool, page_id).await
    }

    async fn contents_for_elements(&self, element_ids: &[i64]) -> Result<Vec<Content>> {
        Content::list_for_elements(&self.pool, element_ids).await
    }

    async fn healthy(&self) -> bool {
        db::check_health(&self.pool).await
    }
}
