use super::types::{request, response};
use crate::{modules::user::repository::UserRepository, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, auth: request::Auth) -> response::Response {
    ctx.db_conn
        .find_user_by_id(&auth.user_id)
        .await
        .map_err(|_| response::Error::FailedToFetchUser)?
        .ok_or(response::Error::UserNotFound)
        .map(response::Success::User)
}
