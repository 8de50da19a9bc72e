use super::types::{request, response};
use crate::{
    modules::{
        category::repository::CategoryRepository, dish::repository::DishRepository,
        restaurant::repository::RestaurantRepository,
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
        .find_restaurant_by_id_and_owner_id(&payload.id, &auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToFetchRestaurant)?
        .ok_or(response::Error::RestaurantNotFound)?;

    let categories = ctx
        .db_conn
        .find_categories_by_restaurant_id(&restaurant.id)
        .await
        .map_err(|_| response::Error::FailedToFetchRestaurant)?;

    let dishes = ctx
        .db_conn
        .find_dishes_by_restaurant_id(&restaurant.id)
        .await
        .map_err(|_| response::Error::FailedToFetchRestaurant)?;

    Ok(response::Success::Restaurant(response::RestaurantDetail {
        menu_url: format!("{}/menu/{}", ctx.app.url, restaurant.id),
        restaurant,
        categories,
        dishes,
    }))
}
