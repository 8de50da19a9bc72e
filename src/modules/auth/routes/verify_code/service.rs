use super::types::{request, response};
use crate::{
    modules::auth::{cookie, service as auth_service},
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

    let signed_in =
        auth_service::session::sign_in_with_code(ctx.clone(), &payload.email, payload.code.trim())
            .await
            .map_err(|err| match err {
                auth_service::Error::InvalidOrExpiredCode => response::Error::InvalidOrExpiredCode,
                auth_service::Error::UnexpectedError => response::Error::FailedToSignIn,
            })?;

    let cookie = cookie::session_cookie(&signed_in.token, &ctx.app.environment).map_err(|err| {
        tracing::error!("Failed to build session cookie: {}", err);
        response::Error::FailedToSignIn
    })?;

    Ok(response::Success::SignedIn {
        user: signed_in.user,
        cookie,
    })
}
