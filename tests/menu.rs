mod common;

use axum::http::StatusCode;
use common::{id_of, TestApp};
use menucard_backend_rs::modules::{
    dish::repository::DishRepository, restaurant::repository::RestaurantRepository,
};
use serde_json::{json, Value};

async fn owner_with_restaurant(app: &TestApp, email: &str) -> (String, String) {
    let token = app.sign_in(email).await;
    let restaurant_id = id_of(&app.create_restaurant(&token, "Kitchen").await);
    (token, restaurant_id)
}

async fn create_dish(app: &TestApp, token: &str, restaurant_id: &str, body: Value) -> Value {
    let response = app
        .post(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            body,
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

    response.body
}

fn category_names(dish: &Value) -> Vec<String> {
    dish["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "cat@example.com").await;

    app.create_category(&token, &restaurant_id, "Starters").await;
    app.create_category(&token, &restaurant_id, "Desserts").await;
    app.create_category(&token, &restaurant_id, "Mains").await;

    let response = app
        .get(
            &format!("/api/restaurants/{restaurant_id}/categories"),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let names = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Desserts", "Mains", "Starters"]);
}

#[tokio::test]
async fn category_rename_and_delete() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "rename@example.com").await;
    let category_id = id_of(&app.create_category(&token, &restaurant_id, "Soups").await);

    let renamed = app
        .patch(
            &format!("/api/categories/{category_id}"),
            json!({ "name": "Broths" }),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], json!("Broths"));

    let deleted = app
        .delete(&format!("/api/categories/{category_id}"), Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let again = app
        .delete(&format!("/api/categories/{category_id}"), Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_needs_an_owned_restaurant() {
    let app = TestApp::new();
    let (_, restaurant_id) = owner_with_restaurant(&app, "owner@example.com").await;
    let stranger = app.sign_in("stranger@example.com").await;

    let create = app
        .post(
            &format!("/api/restaurants/{restaurant_id}/categories"),
            json!({ "name": "Sneaky" }),
            Some(&stranger),
        )
        .await;
    let list = app
        .get(
            &format!("/api/restaurants/{restaurant_id}/categories"),
            Some(&stranger),
        )
        .await;

    assert_eq!(create.status, StatusCode::NOT_FOUND);
    assert_eq!(list.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dish_is_created_with_its_categories() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "dish@example.com").await;
    let spicy = id_of(&app.create_category(&token, &restaurant_id, "Spicy").await);
    let mains = id_of(&app.create_category(&token, &restaurant_id, "Mains").await);

    let dish = create_dish(
        &app,
        &token,
        &restaurant_id,
        json!({
            "name": "Vindaloo",
            "description": "Hot curry",
            "image_url": "https://img.example.com/vindaloo.png",
            "spice_level": 5,
            "price": "12.50",
            "is_vegetarian": false,
            "category_ids": [spicy, mains, spicy],
        }),
    )
    .await;

    assert_eq!(dish["name"], json!("Vindaloo"));
    assert_eq!(dish["spice_level"], json!(5));
    assert_eq!(dish["restaurant_id"], json!(restaurant_id));
    assert_eq!(category_names(&dish), vec!["Mains", "Spicy"]);

    let listed = app
        .get(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            Some(&token),
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(category_names(&listed.body[0]), vec!["Mains", "Spicy"]);
}

#[tokio::test]
async fn dish_rejects_invalid_fields() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "invalid@example.com").await;

    let response = app
        .post(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            json!({
                "name": "",
                "description": "Too hot",
                "image_url": "not a url",
                "spice_level": 9,
                "price": "-1",
            }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    for field in ["name", "image_url", "spice_level", "price"] {
        assert!(response.body["errors"][field].is_array(), "{field}");
    }
}

#[tokio::test]
async fn foreign_category_is_rejected_and_nothing_is_stored() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "two@example.com").await;
    let other_restaurant = id_of(&app.create_restaurant(&token, "Other").await);
    let foreign = id_of(&app.create_category(&token, &other_restaurant, "Foreign").await);

    let response = app
        .post(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            json!({
                "name": "Stray",
                "description": "Wrong menu",
                "category_ids": [foreign],
            }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let dishes = app
        .db
        .find_dishes_by_restaurant_id(&restaurant_id)
        .await
        .unwrap();
    assert!(dishes.is_empty());
}

#[tokio::test]
async fn partly_foreign_categories_fail_the_whole_create() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "mixed@example.com").await;
    let own = id_of(&app.create_category(&token, &restaurant_id, "Own").await);
    let other_restaurant = id_of(&app.create_restaurant(&token, "Other").await);
    let foreign = id_of(&app.create_category(&token, &other_restaurant, "Foreign").await);

    let response = app
        .post(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            json!({
                "name": "Half stray",
                "description": "Mixed menus",
                "category_ids": [own, foreign],
            }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app
        .db
        .find_dishes_by_restaurant_id(&restaurant_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn foreign_categories_leave_an_updated_dish_untouched() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "keep@example.com").await;
    let own = id_of(&app.create_category(&token, &restaurant_id, "Own").await);
    let other_restaurant = id_of(&app.create_restaurant(&token, "Other").await);
    let foreign = id_of(&app.create_category(&token, &other_restaurant, "Foreign").await);
    let dish_id = id_of(
        &create_dish(
            &app,
            &token,
            &restaurant_id,
            json!({ "name": "Biryani", "description": "Rice", "category_ids": [own] }),
        )
        .await,
    );

    let response = app
        .patch(
            &format!("/api/dishes/{dish_id}"),
            json!({ "name": "Renamed", "category_ids": [own, foreign] }),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let dishes = app
        .db
        .find_dishes_by_restaurant_id(&restaurant_id)
        .await
        .unwrap();
    assert_eq!(dishes.len(), 1);
    assert_eq!(dishes[0].dish.name, "Biryani");
    assert_eq!(
        dishes[0]
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Own"]
    );
}

#[tokio::test]
async fn out_of_range_numbers_are_bad_requests() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "range@example.com").await;

    let spice_overflow = app
        .post(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            json!({ "name": "Ghost", "description": "Hot", "spice_level": 70000 }),
            Some(&token),
        )
        .await;
    assert_eq!(spice_overflow.status, StatusCode::BAD_REQUEST);
    assert!(spice_overflow.body["error"].is_string());

    for price in ["1000000000", "12.345"] {
        let response = app
            .post(
                &format!("/api/restaurants/{restaurant_id}/dishes"),
                json!({ "name": "Gold", "description": "Leaf", "price": price }),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{price}");
        assert!(response.body["errors"]["price"].is_array(), "{price}");
    }
}

#[tokio::test]
async fn dish_update_replaces_categories_and_clears_nullable_fields() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "update@example.com").await;
    let starters = id_of(&app.create_category(&token, &restaurant_id, "Starters").await);
    let veggie = id_of(&app.create_category(&token, &restaurant_id, "Veggie").await);

    let dish = create_dish(
        &app,
        &token,
        &restaurant_id,
        json!({
            "name": "Samosa",
            "description": "Crisp pastry",
            "image_url": "https://img.example.com/samosa.png",
            "spice_level": 2,
            "category_ids": [starters],
        }),
    )
    .await;
    let dish_id = id_of(&dish);

    let updated = app
        .patch(
            &format!("/api/dishes/{dish_id}"),
            json!({
                "image_url": null,
                "is_vegetarian": true,
                "category_ids": [veggie],
            }),
            Some(&token),
        )
        .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], json!("Samosa"));
    assert_eq!(updated.body["image_url"], Value::Null);
    assert_eq!(updated.body["spice_level"], json!(2));
    assert_eq!(updated.body["is_vegetarian"], json!(true));
    assert_eq!(category_names(&updated.body), vec!["Veggie"]);

    let untouched = app
        .patch(
            &format!("/api/dishes/{dish_id}"),
            json!({ "name": "Samosa Chaat" }),
            Some(&token),
        )
        .await;
    assert_eq!(untouched.status, StatusCode::OK);
    assert_eq!(category_names(&untouched.body), vec!["Veggie"]);
}

#[tokio::test]
async fn strangers_cannot_touch_dishes_or_categories() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "mine@example.com").await;
    let stranger = app.sign_in("theirs@example.com").await;
    let category_id = id_of(&app.create_category(&token, &restaurant_id, "Mains").await);
    let dish_id = id_of(
        &create_dish(
            &app,
            &token,
            &restaurant_id,
            json!({ "name": "Dal", "description": "Lentils" }),
        )
        .await,
    );

    let responses = [
        app.patch(
            &format!("/api/dishes/{dish_id}"),
            json!({ "name": "Mine now" }),
            Some(&stranger),
        )
        .await,
        app.delete(&format!("/api/dishes/{dish_id}"), Some(&stranger))
            .await,
        app.patch(
            &format!("/api/categories/{category_id}"),
            json!({ "name": "Mine now" }),
            Some(&stranger),
        )
        .await,
        app.delete(&format!("/api/categories/{category_id}"), Some(&stranger))
            .await,
        app.get(
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            Some(&stranger),
        )
        .await,
    ];

    for response in responses {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn deleting_a_category_unlinks_its_dishes() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "unlink@example.com").await;
    let category_id = id_of(&app.create_category(&token, &restaurant_id, "Gone").await);
    create_dish(
        &app,
        &token,
        &restaurant_id,
        json!({ "name": "Naan", "description": "Bread", "category_ids": [category_id] }),
    )
    .await;

    app.delete(&format!("/api/categories/{category_id}"), Some(&token))
        .await;

    let dishes = app
        .db
        .find_dishes_by_restaurant_id(&restaurant_id)
        .await
        .unwrap();
    assert_eq!(dishes.len(), 1);
    assert!(dishes[0].categories.is_empty());
}

#[tokio::test]
async fn deleting_a_restaurant_removes_its_menu() {
    let app = TestApp::new();
    let (token, restaurant_id) = owner_with_restaurant(&app, "cascade@example.com").await;
    let category_id = id_of(&app.create_category(&token, &restaurant_id, "Mains").await);
    create_dish(
        &app,
        &token,
        &restaurant_id,
        json!({ "name": "Korma", "description": "Mild", "category_ids": [category_id] }),
    )
    .await;

    let deleted = app
        .delete(&format!("/api/restaurants/{restaurant_id}"), Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    assert!(app
        .db
        .find_restaurant_by_id(&restaurant_id)
        .await
        .unwrap()
        .is_none());
    assert!(app
        .db
        .find_dishes_by_restaurant_id(&restaurant_id)
        .await
        .unwrap()
        .is_empty());
}
