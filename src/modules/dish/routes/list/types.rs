pub mod request {
    pub use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub restaurant_id: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::dish::repository::DishWithCategories;

    pub enum Success {
        Dishes(Vec<DishWithCategories>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Dishes(dishes) => {
                    (StatusCode::OK, Json(json!(dishes))).into_response()
                }
            }
        }
    }

    pub enum Error {
        RestaurantNotFound,
        FailedToFetchDishes,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::RestaurantNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Restaurant not found" })),
                )
                    .into_response(),
                Self::FailedToFetchDishes => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch dishes" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
