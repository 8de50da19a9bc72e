use super::types::{request, response};
use crate::{modules::restaurant::repository::RestaurantRepository, types::Context};
use std::sync::Arc;

pub async fn service(
    ctx: Arc<Context>,
    auth: request::Auth,
    payload: request::Payload,
) -> response::Response {
    let deleted = ctx
        .db_conn
        .delete_restaurant_by_id_and_owner_id(&payload.id, &auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToDeleteRestaurant)?;

    match deleted {
        true => Ok(response::Success::RestaurantDeleted),
        false => Err(response::Error::RestaurantNotFound),
    }
}
