use super::types::{request, response};
use crate::{
    modules::{
        auth::middleware::Auth,
        category::repository::{CategoryRepository, CreateCategoryPayload},
        restaurant::repository::RestaurantRepository,
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(
    ctx: Arc<Context>,
    auth: Auth,
    payload: request::Payload,
) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let restaurant = ctx
        .db_conn
        .find_restaurant_by_id_and_owner_id(&payload.restaurant_id, &auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToCreateCategory)?
        .ok_or(response::Error::RestaurantNotFound)?;

    ctx.db_conn
        .create_category(CreateCategoryPayload {
            name: payload.body.name.trim().to_string(),
            restaurant_id: restaurant.id,
        })
        .await
        .map_err(|_| response::Error::FailedToCreateCategory)
        .map(response::Success::CategoryCreated)
}
