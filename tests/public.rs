mod common;

use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn menu_is_readable_without_a_session() {
    let app = TestApp::new();
    let token = app.sign_in("chef@example.com").await;
    let restaurant_id = id_of(&app.create_restaurant(&token, "Open Kitchen").await);
    let mains = id_of(&app.create_category(&token, &restaurant_id, "Mains").await);
    let desserts = id_of(&app.create_category(&token, &restaurant_id, "Desserts").await);

    for (name, category_ids) in [
        ("Risotto", json!([mains])),
        ("Tiramisu", json!([desserts, mains])),
        ("Off menu", json!([])),
    ] {
        let response = app
            .post(
                &format!("/api/restaurants/{restaurant_id}/dishes"),
                json!({ "name": name, "description": "House special", "category_ids": category_ids }),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let menu = app
        .get(&format!("/api/public/restaurants/{restaurant_id}/menu"), None)
        .await;

    assert_eq!(menu.status, StatusCode::OK);
    assert_eq!(menu.body["restaurant"]["name"], json!("Open Kitchen"));
    assert_eq!(
        menu.body["restaurant"]["location"],
        json!("12 Harbour Street")
    );
    assert!(menu.body["restaurant"].get("owner_id").is_none());

    let categories = menu.body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["name"], json!("Desserts"));
    assert_eq!(categories[1]["name"], json!("Mains"));

    let dessert_dishes = categories[0]["dishes"].as_array().unwrap();
    assert_eq!(dessert_dishes.len(), 1);
    assert_eq!(dessert_dishes[0]["name"], json!("Tiramisu"));
    assert_eq!(dessert_dishes[0]["categories"].as_array().unwrap().len(), 2);

    let main_dishes = categories[1]["dishes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(main_dishes, vec!["Tiramisu", "Risotto"]);
}

#[tokio::test]
async fn unknown_restaurant_has_no_menu() {
    let app = TestApp::new();

    let response = app
        .get("/api/public/restaurants/01HZZZZZZZZZZZZZZZZZZZZZZZ/menu", None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], json!("Restaurant not found"));
}

#[tokio::test]
async fn empty_restaurant_has_an_empty_menu() {
    let app = TestApp::new();
    let token = app.sign_in("new@example.com").await;
    let restaurant_id = id_of(&app.create_restaurant(&token, "Fresh").await);

    let response = app
        .get(&format!("/api/public/restaurants/{restaurant_id}/menu"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["categories"], json!([]));
}
