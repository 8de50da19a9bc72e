use super::{
    service::service,
    types::{request, response},
};
use crate::types::Context;
use axum::extract::{Path, State};
use std::sync::Arc;

pub async fn handler(
    auth: request::Auth,
    State(ctx): State<Arc<Context>>,
    Path(restaurant_id): Path<String>,
) -> response::Response {
    service(ctx, auth, request::Payload { restaurant_id }).await
}
