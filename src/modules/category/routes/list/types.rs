pub mod request {
    pub use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub restaurant_id: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::category::repository::Category;

    pub enum Success {
        Categories(Vec<Category>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Categories(categories) => {
                    (StatusCode::OK, Json(json!(categories))).into_response()
                }
            }
        }
    }

    pub enum Error {
        RestaurantNotFound,
        FailedToFetchCategories,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::RestaurantNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Restaurant not found" })),
                )
                    .into_response(),
                Self::FailedToFetchCategories => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch categories" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
