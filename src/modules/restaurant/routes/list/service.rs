use super::types::{request, response};
use crate::{modules::restaurant::repository::RestaurantRepository, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: request::Auth) -> response::Response {
    ctx.db_conn
        .find_restaurants_by_owner_id(&auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToFetchRestaurants)
        .map(response::Success::Restaurants)
}
