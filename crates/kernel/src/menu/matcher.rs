//! Active-entry matching against the current request context.

use std::collections::HashMap;

use super::registry::NavigationEntry;

/// The current request's routing context, passed explicitly instead of
/// being read from ambient request globals.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Controller name, with or without a leading path separator.
    pub controller: String,
    /// Action name.
    pub action: String,
    /// Query parameters of the request.
    pub params: HashMap<String, String>,
}

impl RequestContext {
    /// Create a context without parameters.
    pub fn new(controller: &str, action: &str) -> Self {
        Self {
            controller: controller.to_string(),
            action: action.to_string(),
            params: HashMap::new(),
        }
    }

    /// Create a context with query parameters.
    pub fn with_params(controller: &str, action: &str, params: HashMap<String, String>) -> Self {
        Self {
            controller: controller.to_string(),
            action: action.to_string(),
            params,
        }
    }
}

/// Controller names may be stored with or without a leading separator;
/// comparison normalizes this first.
fn normalize_controller(controller: &str) -> &str {
    controller.strip_prefix('/').unwrap_or(controller)
}

/// Check whether one entry matches the request pair on its own: controller
/// equality plus either exact action equality or the current action being
/// listed in the entry's declared nested actions.
pub fn entry_matches(entry: &NavigationEntry, ctx: &RequestContext) -> bool {
    normalize_controller(&entry.controller) == normalize_controller(&ctx.controller)
        && (entry.action == ctx.action || entry.nested_actions.iter().any(|a| a == &ctx.action))
}

/// Check whether an entry is the active one for the request context.
///
/// An entry is active when it matches directly, when any of its direct
/// sub-entries matches, or when any entry of its nested sibling group
/// matches.
pub fn entry_active(entry: &NavigationEntry, ctx: &RequestContext) -> bool {
    entry_matches(entry, ctx)
        || entry.sub_navigation.iter().any(|sub| entry_matches(sub, ctx))
        || entry.nested.iter().any(|sibling| entry_matches(sibling, ctx))
}
