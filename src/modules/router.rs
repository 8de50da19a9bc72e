use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use super::{auth, category, dish, public, restaurant};
use crate::types::Context;
use std::sync::Arc;

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth::get_router())
        .nest("/restaurants", restaurant::get_router())
        .nest(
            "/restaurants/:id/categories",
            category::get_restaurant_router(),
        )
        .nest("/restaurants/:id/dishes", dish::get_restaurant_router())
        .nest("/categories", category::get_router())
        .nest("/dishes", dish::get_router())
        .nest("/public", public::get_router())
}
