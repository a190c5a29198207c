//! Espalier test utilities.
//!
//! Fixture builders and an in-memory [`ContentStore`] so integration tests
//! exercise the real query pipeline, serializers, and routes without a
//! database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value as JsonValue;

use espalier_kernel::content::{ElementFilters, PageFilters};
use espalier_kernel::models::{Content, Element, Page};
use espalier_kernel::store::ContentStore;

/// Fixed timestamp so serialized fixtures are byte-stable across runs.
#[allow(clippy::unwrap_used)]
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Create a published, unrestricted test page.
pub fn test_page(id: i64, urlname: &str) -> Page {
    Page {
        id,
        name: urlname.to_string(),
        urlname: urlname.to_string(),
        page_layout: "standard".to_string(),
        language_code: "en".to_string(),
        parent_id: None,
        lft: 1,
        rgt: 2,
        depth: 0,
        restricted: false,
        public_on: Some(fixed_timestamp()),
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
    }
}

/// Create a public, not-nested test element.
pub fn test_element(id: i64, page_id: i64, name: &str) -> Element {
    Element {
        id,
        name: name.to_string(),
        page_id,
        cell_id: None,
        parent_element_id: None,
        position: id as i32,
        public: true,
        tag_list: Vec::new(),
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
    }
}

/// Create a test content with the given essence payload.
pub fn test_content(id: i64, element_id: i64, name: &str, essence: JsonValue) -> Content {
    Content {
        id,
        name: name.to_string(),
        element_id,
        position: id as i32,
        essence: Some(essence),
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
    }
}

/// Fluent mutators for page fixtures.
pub trait PageFixture {
    fn with_layout(self, layout: &str) -> Self;
    fn with_language(self, language_code: &str) -> Self;
    fn with_parent(self, parent_id: i64) -> Self;
    fn restricted(self) -> Self;
    fn unpublished(self) -> Self;
}

impl PageFixture for Page {
    fn with_layout(mut self, layout: &str) -> Self {
        self.page_layout = layout.to_string();
        self
    }

    fn with_language(mut self, language_code: &str) -> Self {
        self.language_code = language_code.to_string();
        self
    }

    fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }

    fn unpublished(mut self) -> Self {
        self.public_on = None;
        self
    }
}

/// Fluent mutators for element fixtures.
pub trait ElementFixture {
    fn nested_under(self, parent_element_id: i64) -> Self;
    fn at_position(self, position: i32) -> Self;
    fn hidden(self) -> Self;
    fn with_tags(self, tags: &[&str]) -> Self;
}

impl ElementFixture for Element {
    fn nested_under(mut self, parent_element_id: i64) -> Self {
        self.parent_element_id = Some(parent_element_id);
        self
    }

    fn at_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    fn hidden(mut self) -> Self {
        self.public = false;
        self
    }

    fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tag_list = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Fluent mutators for content fixtures.
pub trait ContentFixture {
    fn at_position(self, position: i32) -> Self;
    fn without_essence(self) -> Self;
}

impl ContentFixture for Content {
    fn at_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    fn without_essence(mut self) -> Self {
        self.essence = None;
        self
    }
}

/// In-memory content store.
///
/// Applies the same conjunctive filter semantics as the Postgres store,
/// via the filters' own `matches` predicates.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Vec<Page>,
    elements: Vec<Element>,
    contents: Vec<Content>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Add an element.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Add a content.
    pub fn with_content(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_page(&self, id: i64) -> Result<Option<Page>> {
        Ok(self.pages.iter().find(|p| p.id == id).cloned())
    }

    async fn find_page_by_urlname(
        &self,
        urlname: &str,
        language_code: &str,
    ) -> Result<Option<Page>> {
        Ok(self
            .pages
            .iter()
            .find(|p| p.urlname == urlname && p.language_code == language_code)
            .cloned())
    }

    async fn language_root(&self, language_code: &str) -> Result<Option<Page>> {
        Ok(self
            .pages
            .iter()
            .find(|p| p.parent_id.is_none() && p.language_code == language_code)
            .cloned())
    }

    async fn list_pages(&self, filters: &PageFilters) -> Result<Vec<Page>> {
        let mut pages: Vec<Page> = self
            .pages
            .iter()
            .filter(|p| filters.matches(p))
            .cloned()
            .collect();
        pages.sort_by(|a, b| {
            (&a.language_code, a.lft)
                .cmp(&(&b.language_code, b.lft))
        });
        Ok(pages)
    }

    async fn find_element(&self, id: i64) -> Result<Option<Element>> {
        Ok(self.elements.iter().find(|e| e.id == id).cloned())
    }

    async fn list_elements(&self, filters: &ElementFilters) -> Result<Vec<Element>> {
        let mut elements: Vec<Element> = self
            .elements
            .iter()
            .filter(|e| e.parent_element_id.is_none() && filters.matches(e))
            .cloned()
            .collect();
        elements.sort_by_key(|e| (e.page_id, e.position));
        Ok(elements)
    }

    async fn elements_for_page(&self, page_id: i64) -> Result<Vec<Element>> {
        let mut elements: Vec<Element> = self
            .elements
            .iter()
            .filter(|e| e.page_id == page_id)
            .cloned()
            .collect();
        elements.sort_by_key(|e| (e.parent_element_id, e.position));
        Ok(elements)
    }

    async fn contents_for_elements(&self, element_ids: &[i64]) -> Result<Vec<Content>> {
        let mut contents: Vec<Content> = self
            .contents
            .iter()
            .filter(|c| element_ids.contains(&c.element_id))
            .cloned()
            .collect();
        contents.sort_by_key(|c| (c.element_id, c.position));
        Ok(contents)
    }

    async fn healthy(&self) -> bool {
        true
    }
}
