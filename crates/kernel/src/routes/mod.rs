//! HTTP route handlers.

pub mod element;
pub mod health;
pub mod page;

use axum::Router;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(element::router())
        .merge(page::router())
        .merge(health::router())
        .with_state(state)
}
