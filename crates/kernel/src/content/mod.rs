//! Content system: element definitions, essence serialization, the page
//! tree serializer, and the access-scoped query pipeline.

mod definitions;
mod essence;
mod scope;
mod serializer;
mod service;
mod tree;

pub use definitions::{ElementDefinition, ElementDefinitionRegistry};
pub use essence::{Essence, IngredientError, ingredient};
pub use scope::{ElementFilters, PageFilters, parse_named};
pub use serializer::{ElementJson, serialize_element};
pub use service::ContentService;
pub use tree::{
    ElementArena, ElementNode, MAX_TREE_DEPTH, PageTreeJson, TreeDepth, TreeError,
    serialize_page_tree,
};
