use super::types::{request, response};
use crate::{
    modules::auth::{cookie, service as auth_service},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: request::Auth) -> response::Response {
    // The cookie is cleared even when the session row could not be removed.
    if auth_service::session::revoke(ctx.clone(), &auth.session_token)
        .await
        .is_err()
    {
        tracing::error!("Failed to revoke session of user {}", auth.user_id);
    }

    cookie::clear_session_cookie(&ctx.app.environment)
        .map_err(|err| {
            tracing::error!("Failed to build session cookie: {}", err);
            response::Error::FailedToLogOut
        })
        .map(response::Success::LoggedOut)
}
