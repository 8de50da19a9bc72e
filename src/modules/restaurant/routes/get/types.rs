pub mod request {
    pub use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub id: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde::Serialize;
    use serde_json::json;

    use crate::modules::{
        category::repository::Category, dish::repository::DishWithCategories,
        restaurant::repository::Restaurant,
    };

    /// `menu_url` is the public page a QR code should point at.
    #[derive(Serialize)]
    pub struct RestaurantDetail {
        #[serde(flatten)]
        pub restaurant: Restaurant,
        pub categories: Vec<Category>,
        pub dishes: Vec<DishWithCategories>,
        pub menu_url: String,
    }

    pub enum Success {
        Restaurant(RestaurantDetail),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Restaurant(restaurant) => {
                    (StatusCode::OK, Json(json!(restaurant))).into_response()
                }
            }
        }
    }

    pub enum Error {
        RestaurantNotFound,
        FailedToFetchRestaurant,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::RestaurantNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Restaurant not found" })),
                )
                    .into_response(),
                Self::FailedToFetchRestaurant => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch restaurant" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
