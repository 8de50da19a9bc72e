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
        CategoryDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CategoryDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "Category deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        CategoryNotFound,
        FailedToDeleteCategory,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CategoryNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Category not found" })),
                )
                    .into_response(),
                Self::FailedToDeleteCategory => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete category" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
