pub mod request {
    use crate::utils::validation::validate_not_blank;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(custom(function = "validate_not_blank"))]
        pub name: String,
    }

    pub struct Payload {
        pub id: String,
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::{modules::category::repository::Category, utils};

    pub enum Success {
        CategoryUpdated(Category),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CategoryUpdated(category) => {
                    (StatusCode::OK, Json(json!(category))).into_response()
                }
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        CategoryNotFound,
        FailedToUpdateCategory,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => {
                    utils::validation::into_response(errors).into_response()
                }
                Self::CategoryNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Category not found" })),
                )
                    .into_response(),
                Self::FailedToUpdateCategory => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update category" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
