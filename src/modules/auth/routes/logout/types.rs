pub mod request {
    pub use crate::modules::auth::middleware::Auth;
}

pub mod response {
    use axum::{
        extract::Json,
        http::{header::SET_COOKIE, HeaderValue, StatusCode},
        response::IntoResponse,
    };
    use serde_json::json;

    pub enum Success {
        LoggedOut(HeaderValue),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::LoggedOut(cookie) => (
                    StatusCode::OK,
                    [(SET_COOKIE, cookie)],
                    Json(json!({ "message": "Logged out" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToLogOut,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToLogOut => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to log out" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
