//! Page JSON API endpoints.
//!
//! Pages resolve by numeric id or by `(urlname, locale)`; the nested
//! endpoints return the full authorized element tree of one page.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::content::{PageFilters, PageTreeJson, TreeDepth, parse_named};
use crate::error::AppResult;
use crate::models::Page as PageRecord;
use crate::permissions::UserContext;
use crate::state::AppState;

/// Query parameters for listing pages.
#[derive(Debug, Deserialize)]
pub struct ListPagesQuery {
    pub page_layout: Option<String>,
}

/// Query parameters for fetching a single page.
#[derive(Debug, Deserialize)]
pub struct ShowPageQuery {
    pub locale: Option<String>,
}

/// Query parameters for the nested tree endpoints.
#[derive(Debug, Deserialize)]
pub struct NestedQuery {
    /// Restrict which element names are expanded at the first level.
    pub elements: Option<String>,
    /// Full traversal (default) vs first level only.
    pub full: Option<bool>,
}

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pages", get(list_pages))
        .route("/api/pages/nested", get(nested_root))
        .route("/api/pages/{id_or_urlname}", get(show_page))
        .route("/api/pages/{page_id}/nested", get(nested_page))
}

/// List authorized pages (own fields only, no element trees).
///
/// GET /api/pages?page_layout=standard
async fn list_pages(
    State(state): State<AppState>,
    user: UserContext,
    Query(query): Query<ListPagesQuery>,
) -> AppResult<Json<Vec<PageRecord>>> {
    let filters = PageFilters {
        page_layout: query.page_layout,
    };

    let pages = state.content().list_pages(&filters, &user).await?;
    Ok(Json(pages))
}

/// Fetch one page by id, falling back to `(urlname, locale)`.
///
/// GET /api/pages/about?locale=en. 404 if neither resolves, 403 if the
/// page exists but the caller is not authorized.
async fn show_page(
    State(state): State<AppState>,
    user: UserContext,
    Path(ident): Path<String>,
    Query(query): Query<ShowPageQuery>,
) -> AppResult<Json<PageRecord>> {
    let page = state
        .content()
        .show_page(&ident, query.locale.as_deref(), &user)
        .await?;
    Ok(Json(page))
}

/// Serialize the full element tree of one page.
///
/// GET /api/pages/{page_id}/nested?elements=header&full=false
async fn nested_page(
    State(state): State<AppState>,
    user: UserContext,
    Path(page_id): Path<i64>,
    Query(query): Query<NestedQuery>,
) -> AppResult<Json<PageTreeJson>> {
    nested(&state, Some(page_id), query, &user).await
}

/// Serialize the element tree of the current root page.
///
/// GET /api/pages/nested
async fn nested_root(
    State(state): State<AppState>,
    user: UserContext,
    Query(query): Query<NestedQuery>,
) -> AppResult<Json<PageTreeJson>> {
    nested(&state, None, query, &user).await
}

async fn nested(
    state: &AppState,
    page_id: Option<i64>,
    query: NestedQuery,
    user: &UserContext,
) -> AppResult<Json<PageTreeJson>> {
    let depth = if query.full.unwrap_or(true) {
        TreeDepth::Full
    } else {
        TreeDepth::Shallow
    };
    let expand = query.elements.as_deref().map(parse_named);

    let tree = state
        .content()
        .page_tree(page_id, depth, expand.as_deref(), user)
        .await?;
    Ok(Json(tree))
}
