//! Page tree serialization.
//!
//! Elements are traversed through an id-keyed arena rather than embedded
//! owned sub-objects, so cycles introduced by data corruption are detected
//! (visited set) instead of looping, and nesting depth is bounded.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::content::definitions::ElementDefinitionRegistry;
use crate::content::serializer::{ElementJson, serialize_element};
use crate::models::{Content, Element, Page};
use crate::permissions::{AccessAction, AccessPolicy, AccessResource, UserContext};

/// Maximum element nesting depth a tree may reach before traversal is
/// treated as structurally unsound.
pub const MAX_TREE_DEPTH: usize = 64;

/// Traversal mode for page trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDepth {
    /// Only the first level of elements, with empty `nested_elements`.
    Shallow,
    /// Recurse through nested elements (bounded by [`MAX_TREE_DEPTH`]).
    Full,
}

/// Cyclic or malformed tree detected during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("element {0} exceeds the maximum nesting depth of {MAX_TREE_DEPTH}")]
    DepthExceeded(i64),

    #[error("cycle detected at element {0}")]
    CycleDetected(i64),
}

/// One element of a page tree, with its authorized nested children.
#[derive(Debug, Clone, Serialize)]
pub struct ElementNode {
    #[serde(flatten)]
    pub element: ElementJson,
    pub nested_elements: Vec<ElementNode>,
}

/// JSON-safe nested document for one page and its element tree.
#[derive(Debug, Clone, Serialize)]
pub struct PageTreeJson {
    pub id: i64,
    pub name: String,
    pub urlname: String,
    pub page_layout: String,
    pub language_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub elements: Vec<ElementNode>,
}

/// Id-keyed view of one page's elements and contents.
///
/// Children are reached by identifier lookup, siblings kept in position
/// order at every level.
#[derive(Debug, Default)]
pub struct ElementArena {
    elements: HashMap<i64, Element>,
    children: HashMap<i64, Vec<i64>>,
    roots: Vec<i64>,
    contents: HashMap<i64, Vec<Content>>,
}

impl ElementArena {
    /// Build an arena from one page's element and content rows.
    pub fn build(elements: Vec<Element>, contents: Vec<Content>) -> Self {
        let known_ids: HashSet<i64> = elements.iter().map(|e| e.id).collect();

        let mut ordered = elements;
        ordered.sort_by_key(|e| e.position);

        let mut roots = Vec::new();
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(ordered.len());

        for element in ordered {
            match element.parent_element_id {
                None => roots.push(element.id),
                Some(parent_id) if known_ids.contains(&parent_id) => {
                    children.entry(parent_id).or_default().push(element.id);
                }
                Some(parent_id) => {
                    warn!(
                        element = element.id,
                        parent = parent_id,
                        "element parent is not part of this page; dropping from tree"
                    );
                }
            }
            by_id.insert(element.id, element);
        }

        let mut grouped: HashMap<i64, Vec<Content>> = HashMap::new();
        for content in contents {
            grouped.entry(content.element_id).or_default().push(content);
        }
        for list in grouped.values_mut() {
            list.sort_by_key(|c| c.position);
        }

        Self {
            elements: by_id,
            children,
            roots,
            contents: grouped,
        }
    }

    /// Look up an element by id.
    pub fn element(&self, id: i64) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Not-nested element ids in position order.
    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    /// Child element ids of a parent, in position order.
    pub fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Contents of an element, in position order.
    pub fn contents_of(&self, id: i64) -> &[Content] {
        self.contents.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the arena holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Serialize a page and its element tree.
///
/// Authorization is checked per node; a rejected node is pruned together
/// with its entire subtree. An ancestor's visibility never grants
/// visibility to descendants, or vice versa. `expand` restricts which
/// element names appear at the first level.
pub fn serialize_page_tree(
    page: &Page,
    arena: &ElementArena,
    definitions: &ElementDefinitionRegistry,
    policy: &dyn AccessPolicy,
    user: &UserContext,
    depth: TreeDepth,
    expand: Option<&[String]>,
) -> Result<PageTreeJson, TreeError> {
    let mut visited: HashSet<i64> = HashSet::new();
    let mut nodes = Vec::new();

    for &root_id in arena.roots() {
        let Some(root) = arena.element(root_id) else {
            continue;
        };
        if let Some(names) = expand
            && !names.iter().any(|n| n == &root.name)
        {
            continue;
        }
        if !policy.allows(user, AccessAction::Index, AccessResource::Element(root)) {
            continue;
        }

        match depth {
            TreeDepth::Shallow => nodes.push(ElementNode {
                element: serialize_element(root, arena.contents_of(root_id)),
                nested_elements: Vec::new(),
            }),
            TreeDepth::Full => {
                nodes.push(build_subtree(root, arena, definitions, policy, user, &mut visited, 1)?);
            }
        }
    }

    Ok(PageTreeJson {
        id: page.id,
        name: page.name.clone(),
        urlname: page.urlname.clone(),
        page_layout: page.page_layout.clone(),
        language_code: page.language_code.clone(),
        created_at: page.created_at,
        updated_at: page.updated_at,
        elements: nodes,
    })
}

/// Build one authorized subtree.
///
/// Recursion is bounded by [`MAX_TREE_DEPTH`] and the shared visited set,
/// so corrupt data fails fast instead of exhausting the call stack or
/// looping forever.
fn build_subtree(
    element: &Element,
    arena: &ElementArena,
    definitions: &ElementDefinitionRegistry,
    policy: &dyn AccessPolicy,
    user: &UserContext,
    visited: &mut HashSet<i64>,
    depth: usize,
) -> Result<ElementNode, TreeError> {
    if depth > MAX_TREE_DEPTH {
        return Err(TreeError::DepthExceeded(element.id));
    }
    if !visited.insert(element.id) {
        return Err(TreeError::CycleDetected(element.id));
    }

    let mut node = ElementNode {
        element: serialize_element(element, arena.contents_of(element.id)),
        nested_elements: Vec::new(),
    };

    let child_ids = arena.children_of(element.id);
    if child_ids.is_empty() {
        return Ok(node);
    }

    if !definitions.is_nestable(&element.name) {
        // Children under a non-nestable definition violate the data model;
        // the element itself still serializes.
        warn!(
            element = element.id,
            name = %element.name,
            "non-nestable element has children; ignoring them"
        );
        return Ok(node);
    }

    for &child_id in child_ids {
        let Some(child) = arena.element(child_id) else {
            warn!(element = child_id, "child element missing from arena");
            continue;
        };
        if !policy.allows(user, AccessAction::Index, AccessResource::Element(child)) {
            // Prune the entire subtree below an unauthorized node.
            continue;
        }
        node.nested_elements.push(build_subtree(
            child,
            arena,
            definitions,
            policy,
            user,
            visited,
            depth + 1,
        )?);
    }

    Ok(node)
}
