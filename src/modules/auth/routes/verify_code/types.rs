pub mod request {
    use crate::utils::validation::validate_verification_code;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Payload {
        #[validate(email(code = "INVALID_EMAIL", message = "Invalid email address"))]
        pub email: String,
        #[validate(custom(function = "validate_verification_code"))]
        pub code: String,
    }
}

pub mod response {
    use axum::{
        extract::Json,
        http::{header::SET_COOKIE, HeaderValue, StatusCode},
        response::IntoResponse,
    };
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::{modules::user::repository::User, utils};

    pub enum Success {
        SignedIn { user: User, cookie: HeaderValue },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::SignedIn { user, cookie } => (
                    StatusCode::OK,
                    [(SET_COOKIE, cookie)],
                    Json(json!({ "message": "Signed in", "user": user })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        InvalidOrExpiredCode,
        FailedToSignIn,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => {
                    utils::validation::into_response(errors).into_response()
                }
                Self::InvalidOrExpiredCode => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Invalid or expired verification code" })),
                )
                    .into_response(),
                Self::FailedToSignIn => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to sign in" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
