pub mod request {
    use crate::utils::validation::{validate_not_blank, validate_price};
    use serde::Deserialize;
    use sqlx::types::BigDecimal;
    use validator::{Validate, ValidationErrors};

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(custom(function = "validate_not_blank"))]
        pub name: String,
        #[validate(custom(function = "validate_not_blank"))]
        pub description: String,
        #[validate(url(code = "INVALID_URL", message = "Invalid image URL"))]
        pub image_url: Option<String>,
        #[validate(range(
            min = 0,
            max = 5,
            code = "INVALID_SPICE_LEVEL",
            message = "Spice level must be between 0 and 5"
        ))]
        pub spice_level: Option<i16>,
        pub price: Option<BigDecimal>,
        #[serde(default)]
        pub is_vegetarian: bool,
        #[serde(default)]
        pub category_ids: Vec<String>,
    }

    impl Body {
        pub fn validate_all(&self) -> Result<(), ValidationErrors> {
            let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

            if let Some(Err(err)) = self.price.as_ref().map(validate_price) {
                errors.add("price", err);
            }

            match errors.errors().is_empty() {
                true => Ok(()),
                false => Err(errors),
            }
        }
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

    use crate::{modules::dish::repository::DishWithCategories, utils};

    pub enum Success {
        DishCreated(DishWithCategories),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::DishCreated(dish) => (StatusCode::CREATED, Json(json!(dish))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        RestaurantNotFound,
        ForeignCategory,
        FailedToCreateDish,
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
                Self::ForeignCategory => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Some categories do not belong to this restaurant" })),
                )
                    .into_response(),
                Self::FailedToCreateDish => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create dish" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
