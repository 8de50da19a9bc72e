use super::{service::service, types::request};
use crate::{modules::auth::middleware::Auth, types::Context, utils::json::Json};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    auth: Auth,
    State(ctx): State<Arc<Context>>,
    Path(restaurant_id): Path<String>,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, auth, request::Payload { restaurant_id, body }).await
}
