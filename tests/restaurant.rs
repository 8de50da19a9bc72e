mod common;

use axum::http::StatusCode;
use common::{id_of, TestApp, BASE_URL};
use serde_json::json;

#[tokio::test]
async fn restaurant_routes_require_a_session() {
    let app = TestApp::new();

    let list = app.get("/api/restaurants", None).await;
    let create = app
        .post(
            "/api/restaurants",
            json!({ "name": "Nope", "location": "Nowhere" }),
            None,
        )
        .await;

    assert_eq!(list.status, StatusCode::UNAUTHORIZED);
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owner_manages_a_restaurant() {
    let app = TestApp::new();
    let token = app.sign_in("owner@example.com").await;

    let created = app.create_restaurant(&token, "Blue Door").await;
    let id = id_of(&created);
    assert_eq!(created["name"], json!("Blue Door"));
    assert_eq!(created["location"], json!("12 Harbour Street"));

    let updated = app
        .patch(
            &format!("/api/restaurants/{id}"),
            json!({ "location": "14 Harbour Street" }),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], json!("Blue Door"));
    assert_eq!(updated.body["location"], json!("14 Harbour Street"));

    let deleted = app
        .delete(&format!("/api/restaurants/{id}"), Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let missing = app
        .get(&format!("/api/restaurants/{id}"), Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_blank_fields() {
    let app = TestApp::new();
    let token = app.sign_in("blank@example.com").await;

    let response = app
        .post(
            "/api/restaurants",
            json!({ "name": "   ", "location": "Somewhere" }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["errors"]["name"].is_array());
}

#[tokio::test]
async fn list_is_newest_first_and_scoped_to_owner() {
    let app = TestApp::new();
    let alice = app.sign_in("alice@example.com").await;
    let bob = app.sign_in("bob@example.com").await;

    let first = app.create_restaurant(&alice, "First").await;
    let second = app.create_restaurant(&alice, "Second").await;
    app.create_restaurant(&bob, "Elsewhere").await;

    let response = app.get("/api/restaurants", Some(&alice)).await;
    assert_eq!(response.status, StatusCode::OK);

    let ids = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(id_of)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![id_of(&second), id_of(&first)]);
}

#[tokio::test]
async fn detail_includes_menu_and_link() {
    let app = TestApp::new();
    let token = app.sign_in("detail@example.com").await;
    let restaurant = app.create_restaurant(&token, "Detail").await;
    let id = id_of(&restaurant);
    app.create_category(&token, &id, "Mains").await;

    let response = app
        .get(&format!("/api/restaurants/{id}"), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], json!(id));
    assert_eq!(
        response.body["menu_url"],
        json!(format!("{BASE_URL}/menu/{id}"))
    );
    assert_eq!(response.body["categories"][0]["name"], json!("Mains"));
    assert_eq!(response.body["dishes"], json!([]));
}

#[tokio::test]
async fn strangers_cannot_see_or_touch_a_restaurant() {
    let app = TestApp::new();
    let owner = app.sign_in("owner@example.com").await;
    let stranger = app.sign_in("stranger@example.com").await;
    let id = id_of(&app.create_restaurant(&owner, "Private").await);

    let get = app
        .get(&format!("/api/restaurants/{id}"), Some(&stranger))
        .await;
    let update = app
        .patch(
            &format!("/api/restaurants/{id}"),
            json!({ "name": "Taken" }),
            Some(&stranger),
        )
        .await;
    let delete = app
        .delete(&format!("/api/restaurants/{id}"), Some(&stranger))
        .await;

    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let still_there = app
        .get(&format!("/api/restaurants/{id}"), Some(&owner))
        .await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["name"], json!("Private"));
}
