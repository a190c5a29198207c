//! Element JSON API endpoints.
//!
//! Read-only: listing is limited to not-nested elements (elements that are
//! not themselves a nested child of another element) authorized for the
//! caller.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::content::{ElementFilters, ElementJson, parse_named};
use crate::error::AppResult;
use crate::permissions::UserContext;
use crate::state::AppState;

/// Query parameters for listing elements.
#[derive(Debug, Deserialize)]
pub struct ListElementsQuery {
    pub page_id: Option<i64>,
    /// Single name or comma-separated list of names.
    pub named: Option<String>,
}

/// Create the element router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/elements", get(list_elements))
        .route("/api/elements/{id}", get(show_element))
}

/// List authorized, not-nested elements.
///
/// GET /api/elements?page_id=5&named=header,footer
async fn list_elements(
    State(state): State<AppState>,
    user: UserContext,
    Query(query): Query<ListElementsQuery>,
) -> AppResult<Json<Vec<ElementJson>>> {
    let filters = ElementFilters {
        page_id: query.page_id,
        named: query.named.as_deref().map(parse_named).unwrap_or_default(),
    };

    let elements = state.content().list_elements(&filters, &user).await?;
    Ok(Json(elements))
}

/// Fetch one element.
///
/// GET /api/elements/{id}. 404 if absent, 403 if present but unauthorized.
async fn show_element(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<i64>,
) -> AppResult<Json<ElementJson>> {
    let element = state.content().show_element(id, &user).await?;
    Ok(Json(element))
}
