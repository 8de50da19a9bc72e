pub mod request {
    pub use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub id: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        DishDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::DishDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "Dish deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        DishNotFound,
        FailedToDeleteDish,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::DishNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Dish not found" })),
                )
                    .into_response(),
                Self::FailedToDeleteDish => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete dish" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
