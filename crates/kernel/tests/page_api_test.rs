#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the page JSON API and the nested tree endpoint.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use espalier_test_utils::{
    ElementFixture, MemoryStore, PageFixture, test_content, test_element, test_page,
};

use common::{app, get, get_as};

#[tokio::test]
async fn list_filters_by_page_layout() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_page(test_page(2, "news").with_layout("news_index").with_parent(1));

    let app = app(store);

    let (status, body) = get(&app, "/api/pages?page_layout=news_index").await;

    assert_eq!(status, StatusCode::OK);
    let pages = body.as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["urlname"], json!("news"));
}

#[tokio::test]
async fn list_excludes_unpublished_pages_for_anonymous() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_page(test_page(2, "draft").with_parent(1).unpublished());

    let app = app(store);

    let (_, body) = get(&app, "/api/pages").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get_as(&app, "/api/pages", 7, "manage pages").await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn show_resolves_by_id_and_by_urlname() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "index"))
        .with_page(test_page(2, "about").with_parent(1));

    let app = app(store);

    let (status, by_id) = get(&app, "/api/pages/2").await;
    assert_eq!(status, StatusCode::OK);

    let (status, by_urlname) = get(&app, "/api/pages/about?locale=en").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(by_id, by_urlname);
}

#[tokio::test]
async fn show_uses_the_default_locale_when_none_is_given() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "about"))
        .with_page(test_page(2, "about").with_language("de"));

    let app = app(store);

    let (status, body) = get(&app, "/api/pages/about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(1));

    let (status, body) = get(&app, "/api/pages/about?locale=de").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(2));
}

#[tokio::test]
async fn show_distinguishes_not_found_from_forbidden() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_page(test_page(2, "members").with_parent(1).restricted());

    let app = app(store);

    let (status, _) = get(&app, "/api/pages/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/pages/2").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Any authenticated identity may see restricted published pages.
    let (status, _) = get_as(&app, "/api/pages/2", 3, "").await;
    assert_eq!(status, StatusCode::OK);
}

fn nested_store() -> MemoryStore {
    MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_element(test_element(1, 1, "article").at_position(1))
        .with_element(test_element(2, 1, "text_block").nested_under(1).at_position(1))
        .with_element(test_element(3, 1, "text_block").nested_under(1).at_position(2))
        .with_element(test_element(4, 1, "header").at_position(2))
        .with_content(test_content(
            10,
            1,
            "intro",
            json!({"type": "text", "body": "Intro"}),
        ))
        .with_content(test_content(
            11,
            2,
            "body",
            json!({"type": "text", "body": "First"}),
        ))
}

#[tokio::test]
async fn nested_serializes_the_full_tree_in_position_order() {
    let app = app(nested_store());

    let (status, body) = get(&app, "/api/pages/1/nested").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["urlname"], json!("home"));

    let elements = body["elements"].as_array().unwrap();
    let first_level: Vec<i64> = elements.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(first_level, vec![1, 4]);

    // The container serializes its own ingredients and its children as a
    // separate relation.
    assert_eq!(elements[0]["ingredients"], json!(["Intro"]));
    let nested: Vec<i64> = elements[0]["nested_elements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(nested, vec![2, 3]);
    assert_eq!(elements[0]["nested_elements"][0]["ingredients"], json!(["First"]));
}

#[tokio::test]
async fn nested_shallow_emits_exactly_one_level() {
    let app = app(nested_store());

    let (status, body) = get(&app, "/api/pages/1/nested?full=false").await;

    assert_eq!(status, StatusCode::OK);
    let elements = body["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);
    for element in elements {
        assert_eq!(element["nested_elements"], json!([]));
    }
}

#[tokio::test]
async fn nested_elements_filter_restricts_first_level() {
    let app = app(nested_store());

    let (status, body) = get(&app, "/api/pages/1/nested?elements=header").await;

    assert_eq!(status, StatusCode::OK);
    let elements = body["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0]["name"], json!("header"));
}

#[tokio::test]
async fn pruning_is_subtree_wide() {
    // A hidden container with a public child: the child must not surface
    // even though it would pass the predicate on its own.
    let store = MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_element(test_element(1, 1, "article").hidden())
        .with_element(test_element(2, 1, "text_block").nested_under(1));

    let app = app(store);
    let (status, body) = get(&app, "/api/pages/1/nested").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["elements"], json!([]));
}

#[tokio::test]
async fn nested_without_page_id_serializes_the_root_page() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "index"))
        .with_page(test_page(2, "about").with_parent(1))
        .with_element(test_element(1, 1, "header"));

    let app = app(store);
    let (status, body) = get(&app, "/api/pages/nested").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["elements"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn nesting_deeper_than_the_bound_is_a_server_error() {
    // A corrupt parent chain deeper than the traversal bound.
    let mut store = MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_element(test_element(1, 1, "article").at_position(1));
    for id in 2..=70 {
        store = store.with_element(
            test_element(id, 1, "article")
                .nested_under(id - 1)
                .at_position(1),
        );
    }

    let app = app(store);
    let (status, body) = get(&app, "/api/pages/1/nested").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("internal server error"));
}

#[tokio::test]
async fn unpublished_page_tree_is_forbidden_not_missing() {
    let store = MemoryStore::new()
        .with_page(test_page(1, "home"))
        .with_page(test_page(2, "draft").with_parent(1).unpublished());

    let app = app(store);

    let (status, _) = get(&app, "/api/pages/2/nested").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get_as(&app, "/api/pages/2/nested", 7, "manage pages").await;
    assert_eq!(status, StatusCode::OK);
}
