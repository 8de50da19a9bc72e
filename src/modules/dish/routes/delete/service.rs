use super::types::{request, response};
use crate::{modules::dish::repository::DishRepository, types::Context};
use std::sync::Arc;

pub async fn service(
    ctx: Arc<Context>,
    auth: request::Auth,
    payload: request::Payload,
) -> response::Response {
    let deleted = ctx
        .db_conn
        .delete_dish_by_id_and_owner_id(&payload.id, &auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToDeleteDish)?;

    match deleted {
        true => Ok(response::Success::DishDeleted),
        false => Err(response::Error::DishNotFound),
    }
}
