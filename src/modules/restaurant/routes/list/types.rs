pub mod request {
    pub use crate::modules::auth::middleware::Auth;
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::restaurant::repository::Restaurant;

    pub enum Success {
        Restaurants(Vec<Restaurant>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Restaurants(restaurants) => {
                    (StatusCode::OK, Json(json!(restaurants))).into_response()
                }
            }
        }
    }

    pub enum Error {
        FailedToFetchRestaurants,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchRestaurants => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch restaurants" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
