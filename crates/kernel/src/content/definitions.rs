//! Element definition registry.
//!
//! Definitions describe the shape of elements by name and are loaded from a
//! TOML file at startup, then frozen for the process lifetime. Only
//! definitions with `nestable = true` may own child elements.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// A single element definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementDefinition {
    /// Machine name elements reference.
    pub name: String,

    /// Whether elements of this definition may own child elements.
    #[serde(default)]
    pub nestable: bool,

    /// Whether elements of this definition carry tags.
    #[serde(default)]
    pub taggable: bool,

    /// Editor hint text.
    #[serde(default)]
    pub hint: Option<String>,
}

/// Top-level shape of the definitions TOML file.
#[derive(Debug, Deserialize)]
struct DefinitionsFile {
    #[serde(default)]
    elements: Vec<ElementDefinition>,
}

/// Registry of all element definitions.
#[derive(Debug, Default)]
pub struct ElementDefinitionRegistry {
    definitions: HashMap<String, ElementDefinition>,
}

impl ElementDefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read element definitions from {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    /// Parse definitions from TOML source.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: DefinitionsFile =
            toml::from_str(raw).context("failed to parse element definitions")?;

        let mut registry = Self::new();
        for definition in file.elements {
            registry.register(definition);
        }

        debug!(definitions = registry.len(), "loaded element definitions");
        Ok(registry)
    }

    /// Register a definition, replacing any previous one with the same name.
    pub fn register(&mut self, definition: ElementDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Get a definition by name.
    pub fn get(&self, name: &str) -> Option<&ElementDefinition> {
        self.definitions.get(name)
    }

    /// Check whether elements of the named definition may own children.
    ///
    /// Unknown names degrade to non-nestable rather than failing the
    /// request; the mismatch is logged once per lookup.
    pub fn is_nestable(&self, name: &str) -> bool {
        match self.definitions.get(name) {
            Some(definition) => definition.nestable,
            None => {
                warn!(element = %name, "element references unknown definition");
                false
            }
        }
    }

    /// Get definition count.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_definitions_from_toml() {
        let registry = ElementDefinitionRegistry::from_toml_str(
            r#"
            [[elements]]
            name = "header"
            hint = "Page header"

            [[elements]]
            name = "slider"
            nestable = true
            "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_nestable("header"));
        assert!(registry.is_nestable("slider"));
        assert_eq!(
            registry.get("header").unwrap().hint.as_deref(),
            Some("Page header")
        );
    }

    #[test]
    fn unknown_definition_is_not_nestable() {
        let registry = ElementDefinitionRegistry::new();
        assert!(!registry.is_nestable("ghost"));
    }

    #[test]
    fn empty_file_yields_empty_registry() {
        let registry = ElementDefinitionRegistry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
    }
}
