//! Request filters for the access-scoped query layer.
//!
//! Filters are conjunctive: every supplied filter narrows the same base
//! collection, and an absent filter imposes no constraint. The Postgres
//! store compiles these into SQL; the in-memory store used in tests applies
//! the `matches` predicates directly. Authorization is applied afterwards
//! as a separate narrowing step, never here.

use crate::models::{Element, Page};

/// Filters for element collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementFilters {
    /// Restrict to elements of one page.
    pub page_id: Option<i64>,
    /// Restrict to elements with one of these definition names
    /// (empty = no constraint).
    pub named: Vec<String>,
}

impl ElementFilters {
    /// Check an element against all supplied filters.
    pub fn matches(&self, element: &Element) -> bool {
        self.page_id.is_none_or(|id| element.page_id == id)
            && (self.named.is_empty() || self.named.iter().any(|n| n == &element.name))
    }
}

/// Filters for page collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilters {
    /// Restrict to pages with this layout tag.
    pub page_layout: Option<String>,
}

impl PageFilters {
    /// Check a page against all supplied filters.
    pub fn matches(&self, page: &Page) -> bool {
        self.page_layout
            .as_deref()
            .is_none_or(|layout| page.page_layout == layout)
    }
}

/// Parse a `named` query value: a single name or a comma-separated list.
pub fn parse_named(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
