use super::types::{request, response};
use crate::{
    modules::{
        category::repository::CategoryRepository, restaurant::repository::RestaurantRepository,
    },
    types::Context,
};
use std::sync::Arc;

pub async fn service(
    ctx: Arc<Context>,
    auth: request::Auth,
    payload: request::Payload,
) -> response::Response {
    let restaurant = ctx
        .db_conn
        .find_restaurant_by_id_and_owner_id(&payload.restaurant_id, &auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToFetchCategories)?
        .ok_or(response::Error::RestaurantNotFound)?;

    ctx.db_conn
        .find_categories_by_restaurant_id(&restaurant.id)
        .await
        .map_err(|_| response::Error::FailedToFetchCategories)
        .map(response::Success::Categories)
}
