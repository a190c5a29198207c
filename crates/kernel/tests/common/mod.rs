#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]
//! Common test utilities for integration tests.
//!
//! Tests run the real router, service, and serializers against an
//! in-memory store; only the Postgres layer is swapped out.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use espalier_kernel::content::ElementDefinitionRegistry;
use espalier_kernel::menu::NavigationRegistry;
use espalier_kernel::permissions::PermissionPolicy;
use espalier_kernel::routes;
use espalier_kernel::state::AppState;
use espalier_test_utils::MemoryStore;

/// Definitions used by the integration tests: one nestable container and
/// two leaf definitions.
pub fn definitions() -> ElementDefinitionRegistry {
    ElementDefinitionRegistry::from_toml_str(
        r#"
        [[elements]]
        name = "header"

        [[elements]]
        name = "article"
        nestable = true

        [[elements]]
        name = "text_block"
        "#,
    )
    .expect("test definitions must parse")
}

/// Build the application router over an in-memory store, with the default
/// permission policy.
pub fn app(store: MemoryStore) -> Router {
    let state = AppState::with_store(
        Arc::new(store),
        Arc::new(definitions()),
        Arc::new(NavigationRegistry::with_defaults()),
        Arc::new(PermissionPolicy),
        "en".to_string(),
    );
    routes::app(state)
}

/// Perform an anonymous GET and return status plus raw body.
pub async fn get_raw(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Perform an anonymous GET and return status plus parsed JSON body.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get_raw(app, uri).await;
    (status, parse(body))
}

/// Perform a GET as an authenticated user with the given permissions.
pub async fn get_as(
    app: &Router,
    uri: &str,
    user_id: i64,
    permissions: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .header("x-user-permissions", permissions)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, parse(body))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn parse(body: Vec<u8>) -> serde_json::Value {
    if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    }
}
