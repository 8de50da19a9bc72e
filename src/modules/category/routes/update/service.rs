use super::types::{request, response};
use crate::{
    modules::{auth::middleware::Auth, category::repository::CategoryRepository},
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
        .update_category_by_id_and_owner_id(
            &payload.id,
            &auth.user_id,
            payload.body.name.trim().to_string(),
        )
        .await
        .map_err(|_| response::Error::FailedToUpdateCategory)?
        .ok_or(response::Error::CategoryNotFound)
        .map(response::Success::CategoryUpdated)
}
