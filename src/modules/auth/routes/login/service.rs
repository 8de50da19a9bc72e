use super::types::{request, response};
use crate::{
    modules::{auth::service::verification, user::repository::UserRepository},
    types::Context,
    utils::validation::normalize_email,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, mut payload: request::Payload) -> response::Response {
    payload.email = normalize_email(&payload.email);
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let user = ctx
        .db_conn
        .find_user_by_email(&payload.email)
        .await
        .map_err(|_| response::Error::FailedToSendCode)?
        .ok_or(response::Error::UserNotFound)?;

    verification::issue(ctx, &user.email)
        .await
        .map_err(|_| response::Error::FailedToSendCode)
        .map(|_| response::Success::CodeSent)
}
