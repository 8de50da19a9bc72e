use super::types::{request, response};
use crate::{
    modules::{
        auth::middleware::Auth,
        dish::repository::{self, CreateDishPayload, DishRepository},
        restaurant::repository::RestaurantRepository,
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

    let restaurant = ctx
        .db_conn
        .find_restaurant_by_id_and_owner_id(&payload.restaurant_id, &auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToCreateDish)?
        .ok_or(response::Error::RestaurantNotFound)?;

    let body = payload.body;
    ctx.db_conn
        .create_dish(CreateDishPayload {
            restaurant_id: restaurant.id,
            name: body.name.trim().to_string(),
            description: body.description.trim().to_string(),
            image_url: body.image_url,
            spice_level: body.spice_level,
            price: body.price,
            is_vegetarian: body.is_vegetarian,
            category_ids: body.category_ids.into_iter().unique().collect(),
        })
        .await
        .map_err(|err| match err {
            repository::Error::CategoryNotInRestaurant => response::Error::ForeignCategory,
            repository::Error::UnexpectedError => response::Error::FailedToCreateDish,
        })
        .map(response::Success::DishCreated)
}
