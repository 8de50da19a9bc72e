pub mod request {
    use crate::utils::validation::validate_not_blank;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Payload {
        #[validate(email(code = "INVALID_EMAIL", message = "Invalid email address"))]
        pub email: String,
        #[validate(custom(function = "validate_not_blank"))]
        pub full_name: String,
        #[validate(custom(function = "validate_not_blank"))]
        pub country: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::utils;

    pub enum Success {
        CodeSent,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CodeSent => (
                    StatusCode::OK,
                    Json(json!({ "message": "Verification code sent" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        FailedToSendCode,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => {
                    utils::validation::into_response(errors).into_response()
                }
                Self::FailedToSendCode => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to send verification code" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
