use super::types::{request, response};
use crate::{
    modules::{
        auth::middleware::Auth,
        restaurant::repository::{RestaurantRepository, UpdateRestaurantPayload},
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

    ctx.db_conn
        .update_restaurant_by_id_and_owner_id(
            &payload.id,
            &auth.user_id,
            UpdateRestaurantPayload {
                name: payload.body.name.map(|name| name.trim().to_string()),
                location: payload
                    .body
                    .location
                    .map(|location| location.trim().to_string()),
            },
        )
        .await
        .map_err(|_| response::Error::FailedToUpdateRestaurant)?
        .ok_or(response::Error::RestaurantNotFound)
        .map(response::Success::RestaurantUpdated)
}
