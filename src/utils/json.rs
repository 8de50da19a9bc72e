use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Request body extractor. Unreadable bodies are rejected with 400 and a JSON
/// `{"error": ...}` instead of axum's plain-text 422.
pub struct Json<T>(pub T);

fn rejection_response(rejection: JsonRejection) -> Response {
    let message = rejection.body_text();
    tracing::warn!("Failed to parse request body: {}", message);

    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "error": message })),
    )
        .into_response()
}

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::Json::<T>::from_request(req, state)
            .await
            .map(|axum::Json(value)| Json(value))
            .map_err(rejection_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize)]
    struct Payload {
        name: String,
        level: i16,
    }

    fn request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn status_of(body: &str) -> StatusCode {
        match Json::<Payload>::from_request(request(body), &()).await {
            Ok(_) => StatusCode::OK,
            Err(response) => response.status(),
        }
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        assert_eq!(status_of(r#"{"name":"a","level":1}"#).await, StatusCode::OK);
        assert_eq!(status_of(r#"{"name":"a"}"#).await, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(r#"{"name":"a","level":70000}"#).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of("{").await, StatusCode::BAD_REQUEST);
    }
}
