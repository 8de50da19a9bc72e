use super::types::{request, response};
use crate::{
    modules::{
        auth::middleware::Auth,
        restaurant::repository::{CreateRestaurantPayload, RestaurantRepository},
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
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    ctx.db_conn
        .create_restaurant(CreateRestaurantPayload {
            name: payload.name.trim().to_string(),
            location: payload.location.trim().to_string(),
            owner_id: auth.user_id,
        })
        .await
        .map_err(|_| response::Error::FailedToCreateRestaurant)
        .map(response::Success::RestaurantCreated)
}
