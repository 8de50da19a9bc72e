use super::types::{request, response};
use crate::{
    modules::{
        auth::middleware::Auth,
        dish::repository::{self, DishRepository, UpdateDishPayload},
    },
    types::Context,
};
use itertools::Itertools;
use std::sync::Arc;

pub async fn service(
    ctx: Arc<Context>,
    auth: Auth,
    payload: request::Payload,
) -> response::Response {
    payload.body.validate_all().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let body = payload.body;
    ctx.db_conn
        .update_dish_by_id_and_owner_id(
            &payload.id,
            &auth.user_id,
            UpdateDishPayload {
                name: body.name.map(|name| name.trim().to_string()),
                description: body
                    .description
                    .map(|description| description.trim().to_string()),
                image_url: body.image_url,
                spice_level: body.spice_level,
                price: body.price,
                is_vegetarian: body.is_vegetarian,
                category_ids: body
                    .category_ids
                    .map(|category_ids| category_ids.into_iter().unique().collect()),
            },
        )
        .await
        .map_err(|err| match err {
            repository::Error::CategoryNotInRestaurant => response::Error::ForeignCategory,
            repository::Error::UnexpectedError => response::Error::FailedToUpdateDish,
        })?
        .ok_or(response::Error::DishNotFound)
        .map(response::Success::DishUpdated)
}
