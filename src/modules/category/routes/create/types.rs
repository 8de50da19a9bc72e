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
        pub restaurant_id: String,
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    use crate::{modules::category::repository::Category, utils};

    pub enum Success {
        CategoryCreated(Category),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CategoryCreated(category) => {
                    (StatusCode::CREATED, Json(json!(category))).into_response()
                }
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        RestaurantNotFound,
        FailedToCreateCategory,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => {
                    utils::validation::into_response(errors).into_response()
                }
                Self::RestaurantNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Restaurant not found" })),
                )
                    .into_response(),
                Self::FailedToCreateCategory => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create category" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
