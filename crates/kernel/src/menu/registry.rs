//! Navigation registry - collects and manages menu entry definitions.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::{RequestContext, entry_active};

/// A navigation menu entry.
///
/// `nested_actions` lists further action names that count as a match for
/// this entry's controller; `nested` is a sibling group matched alongside
/// the entry; `sub_navigation` holds the entry's child menu, recursively of
/// the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Display key for the entry.
    pub name: String,

    /// Controller name, with or without a leading path separator.
    pub controller: String,

    /// Action name.
    pub action: String,

    /// Further action names treated as matching this entry.
    #[serde(default)]
    pub nested_actions: Vec<String>,

    /// Nested sibling group matched together with this entry.
    #[serde(default)]
    pub nested: Vec<NavigationEntry>,

    /// Sub-entries of this entry.
    #[serde(default)]
    pub sub_navigation: Vec<NavigationEntry>,
}

/// Top-level shape of the navigation TOML file.
#[derive(Debug, Deserialize)]
struct NavigationFile {
    #[serde(default)]
    entries: Vec<NavigationEntry>,
}

/// Registry of all navigation entries.
#[derive(Debug, Default)]
pub struct NavigationRegistry {
    entries: Vec<NavigationEntry>,
}

impl NavigationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the core entries.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigationEntry {
            name: "pages".to_string(),
            controller: "pages".to_string(),
            action: "index".to_string(),
            nested_actions: vec!["show".to_string(), "nested".to_string()],
            nested: Vec::new(),
            sub_navigation: Vec::new(),
        });
        registry.register(NavigationEntry {
            name: "elements".to_string(),
            controller: "elements".to_string(),
            action: "index".to_string(),
            nested_actions: vec!["show".to_string()],
            nested: Vec::new(),
            sub_navigation: Vec::new(),
        });
        registry
    }

    /// Load a registry from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read navigation from {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    /// Parse a registry from TOML source.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: NavigationFile = toml::from_str(raw).context("failed to parse navigation")?;

        let registry = Self {
            entries: file.entries,
        };
        debug!(entries = registry.len(), "loaded navigation entries");
        Ok(registry)
    }

    /// Register a top-level entry.
    pub fn register(&mut self, entry: NavigationEntry) {
        self.entries.push(entry);
    }

    /// All top-level entries in registration order.
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    /// The active top-level entry for a request context, if any.
    pub fn active_entry(&self, ctx: &RequestContext) -> Option<&NavigationEntry> {
        self.entries.iter().find(|entry| entry_active(entry, ctx))
    }

    /// Get entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn registry_from_toml() {
        let registry = NavigationRegistry::from_toml_str(
            r#"
            [[entries]]
            name = "products"
            controller = "products"
            action = "index"

            [[entries.sub_navigation]]
            name = "edit"
            controller = "products"
            action = "edit"
            nested_actions = ["update"]
            "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].sub_navigation.len(), 1);
        assert_eq!(
            registry.entries()[0].sub_navigation[0].nested_actions,
            vec!["update"]
        );
    }

    #[test]
    fn active_entry_resolves_through_sub_navigation() {
        let registry = NavigationRegistry::from_toml_str(
            r#"
            [[entries]]
            name = "orders"
            controller = "orders"
            action = "index"

            [[entries]]
            name = "products"
            controller = "products"
            action = "index"

            [[entries.sub_navigation]]
            name = "edit"
            controller = "products"
            action = "edit"
            nested_actions = ["update"]
            "#,
        )
        .unwrap();

        let ctx = RequestContext::new("products", "update");
        let active = registry.active_entry(&ctx).unwrap();
        assert_eq!(active.name, "products");

        let ctx = RequestContext::new("invoices", "index");
        assert!(registry.active_entry(&ctx).is_none());
    }

    #[test]
    fn defaults_cover_core_controllers() {
        let registry = NavigationRegistry::with_defaults();
        assert!(registry.active_entry(&RequestContext::new("pages", "nested")).is_some());
        assert!(registry.active_entry(&RequestContext::new("elements", "show")).is_some());
    }
}
