//! Requesting identity and the injected authorization predicate.
//!
//! Authorization is modeled as an opaque predicate over (identity, action,
//! resource) rather than behavior on the resource entities themselves, so
//! the query and serialization layers stay independent of any particular
//! permission system.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::{Element, Page};

/// Header carrying the upstream-authenticated user id.
const HEADER_USER_ID: &str = "x-user-id";

/// Header carrying the user's permission names, comma-separated.
const HEADER_USER_PERMISSIONS: &str = "x-user-permissions";

/// The requesting identity.
///
/// Authentication itself happens upstream (a gateway or session layer);
/// the kernel only consumes the resolved identity.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// User ID (0 for anonymous).
    pub id: i64,
    /// Whether the user is authenticated.
    pub authenticated: bool,
    /// Permission names granted to the user.
    pub permissions: Vec<String>,
}

impl UserContext {
    /// Create context for an anonymous user.
    pub fn anonymous() -> Self {
        Self {
            id: 0,
            authenticated: false,
            permissions: Vec::new(),
        }
    }

    /// Create context for an authenticated user.
    pub fn authenticated(id: i64, permissions: Vec<String>) -> Self {
        Self {
            id,
            authenticated: true,
            permissions,
        }
    }

    /// Check if the user has a specific permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(HEADER_USER_ID)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());

        let Some(id) = user_id else {
            return Ok(Self::anonymous());
        };

        let permissions = parts
            .headers
            .get(HEADER_USER_PERMISSIONS)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self::authenticated(id, permissions))
    }
}

/// What the caller wants to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    /// Appear in a collection listing or tree.
    Index,
    /// Be fetched as a single resource.
    Show,
}

/// The resource an access decision is about.
#[derive(Debug, Clone, Copy)]
pub enum AccessResource<'a> {
    Page(&'a Page),
    Element(&'a Element),
}

/// Injected authorization predicate.
///
/// Implementations must be pure with respect to their inputs: the same
/// (identity, action, resource) triple always yields the same answer
/// within one request.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, user: &UserContext, action: AccessAction, resource: AccessResource<'_>) -> bool;
}

/// Default permission-based policy.
///
/// - Elements: visible when `public`, or to holders of "manage elements".
/// - Pages: visible when published, or to holders of "manage pages";
///   restricted pages additionally require an authenticated identity.
#[derive(Debug, Clone, Default)]
pub struct PermissionPolicy;

impl AccessPolicy for PermissionPolicy {
    fn allows(
        &self,
        user: &UserContext,
        _action: AccessAction,
        resource: AccessResource<'_>,
    ) -> bool {
        match resource {
            AccessResource::Element(element) => {
                element.public || user.has_permission("manage elements")
            }
            AccessResource::Page(page) => {
                let published = page.is_public() || user.has_permission("manage pages");
                let unrestricted = !page.restricted || user.authenticated;
                published && unrestricted
            }
        }
    }
}
