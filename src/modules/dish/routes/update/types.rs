pub mod request {
    use crate::utils::validation::{
        validate_not_blank, validate_price, validate_spice_level, validate_url,
    };
    use serde::Deserialize;
    use sqlx::types::BigDecimal;
    use validator::{Validate, ValidationErrors};

    /// `image_url`, `spice_level` and `price` accept an explicit `null` to
    /// clear the stored value.
    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(custom(function = "validate_not_blank"))]
        pub name: Option<String>,
        #[validate(custom(function = "validate_not_blank"))]
        pub description: Option<String>,
        #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
        pub image_url: Option<Option<String>>,
        #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
        pub spice_level: Option<Option<i16>>,
        #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
        pub price: Option<Option<BigDecimal>>,
        pub is_vegetarian: Option<bool>,
        pub category_ids: Option<Vec<String>>,
    }

    impl Body {
        pub fn validate_all(&self) -> Result<(), ValidationErrors> {
            let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

            if let Some(Some(image_url)) = &self.image_url {
                if let Err(err) = validate_url(image_url) {
                    errors.add("image_url", err);
                }
            }
            if let Some(Some(spice_level)) = self.spice_level {
                if let Err(err) = validate_spice_level(spice_level) {
                    errors.add("spice_level", err);
                }
            }
            if let Some(Some(price)) = &self.price {
                if let Err(err) = validate_price(price) {
                    errors.add("price", err);
                }
            }

            match errors.errors().is_empty() {
                true => Ok(()),
                false => Err(errors),
            }
        }
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

    use crate::{modules::dish::repository::DishWithCategories, utils};

    pub enum Success {
        DishUpdated(DishWithCategories),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::DishUpdated(dish) => (StatusCode::OK, Json(json!(dish))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        DishNotFound,
        ForeignCategory,
        FailedToUpdateDish,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => {
                    utils::validation::into_response(errors).into_response()
                }
                Self::DishNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Dish not found" })),
                )
                    .into_response(),
                Self::ForeignCategory => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Some categories do not belong to this restaurant" })),
                )
                    .into_response(),
                Self::FailedToUpdateDish => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update dish" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
