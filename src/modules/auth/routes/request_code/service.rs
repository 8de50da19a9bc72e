use super::types::{request, response};
use crate::{
    modules::{
        auth::service::verification,
        user::repository::{UpsertUserPayload, UserRepository},
    },
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

    // Registering again refreshes the profile and invalidates older codes.
    ctx.db_conn
        .upsert_user(UpsertUserPayload {
            email: payload.email.clone(),
            full_name: payload.full_name.trim().to_string(),
            country: payload.country.trim().to_string(),
        })
        .await
        .map_err(|_| response::Error::FailedToSendCode)?;

    verification::issue(ctx, &payload.email)
        .await
        .map_err(|_| response::Error::FailedToSendCode)
        .map(|_| response::Success::CodeSent)
}
