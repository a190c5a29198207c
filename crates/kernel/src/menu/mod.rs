//! Navigation menu definitions and active-state matching.
//!
//! The menu tree is declarative configuration, registered at startup and
//! frozen for the process lifetime. The matcher determines which entry is
//! "active" for the current request context; it is a pure predicate
//! consumed by presentation layers.

mod matcher;
mod registry;

pub use matcher::{RequestContext, entry_active, entry_matches};
pub use registry::{NavigationEntry, NavigationRegistry};
