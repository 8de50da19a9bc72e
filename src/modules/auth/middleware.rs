use super::{cookie, service};
use crate::types::Context;
use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use serde_json::json;
use std::sync::Arc;

/// Identity of the session owner. Extracting it rejects the request with 401
/// unless the `session_token` cookie resolves to a live session.
#[derive(Clone, Debug)]
pub struct Auth {
    pub user_id: String,
    pub email: String,
    pub session_token: String,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to resolve session" })),
    )
        .into_response()
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let Extension(ctx) = parts
            .extract::<Extension<Arc<Context>>>()
            .await
            .map_err(|err| {
                tracing::error!("Request context is missing: {}", err);
                internal_error()
            })?;

        let token = cookie::session_token(&parts.headers).ok_or_else(unauthorized)?;

        match service::session::resolve(ctx, &token).await {
            Ok(Some(session)) => Ok(Self {
                user_id: session.user_id,
                email: session.email,
                session_token: token,
            }),
            Ok(None) => Err(unauthorized()),
            Err(_) => Err(internal_error()),
        }
    }
}
