#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use menucard_backend_rs::{
    app,
    modules::notification::service::{self as notification, Mailer},
    types::{AppContext, AppEnvironment, Context},
    utils::database::MemoryDatabase,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const BASE_URL: &str = "http://menus.test";

/// Keeps every code it is asked to deliver.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn codes_for(&self, email: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_code(&self, email: &str, code: &str) -> notification::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_verification_code(&self, _: &str, _: &str) -> notification::Result<()> {
        Err(notification::Error::NotSent)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn session_token(&self) -> Option<String> {
        self.headers
            .get(SET_COOKIE)?
            .to_str()
            .ok()?
            .split(';')
            .next()?
            .strip_prefix("session_token=")
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<MemoryDatabase>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        Self::build(mailer.clone(), mailer)
    }

    pub fn with_failing_mailer() -> Self {
        Self::build(Arc::new(FailingMailer), Arc::new(RecordingMailer::default()))
    }

    fn build(mailer: Arc<dyn Mailer>, recording: Arc<RecordingMailer>) -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let ctx = Arc::new(Context {
            app: AppContext {
                host: String::from("127.0.0.1"),
                environment: AppEnvironment::Development,
                port: 8000,
                url: String::from(BASE_URL),
            },
            db_conn: db.clone(),
            mailer,
        });

        Self {
            router: app::router(ctx),
            db,
            mailer: recording,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(COOKIE, format!("session_token={token}"));
        }
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), token).await
    }

    pub async fn patch(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body), token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, token).await
    }

    /// Registers `email` and returns the code that was mailed.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .post(
                "/api/auth/request-code",
                json!({ "email": email, "full_name": "Ada Owner", "country": "US" }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);

        self.mailer.last_code_for(email).unwrap()
    }

    pub async fn verify(&self, email: &str, code: &str) -> TestResponse {
        self.post(
            "/api/auth/verify-code",
            json!({ "email": email, "code": code }),
            None,
        )
        .await
    }

    /// Registers and verifies `email`, returning the session token.
    pub async fn sign_in(&self, email: &str) -> String {
        let code = self.register(email).await;
        let response = self.verify(email, &code).await;
        assert_eq!(response.status, StatusCode::OK);

        response.session_token().unwrap()
    }

    pub async fn create_restaurant(&self, token: &str, name: &str) -> Value {
        let response = self
            .post(
                "/api/restaurants",
                json!({ "name": name, "location": "12 Harbour Street" }),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        response.body
    }

    pub async fn create_category(&self, token: &str, restaurant_id: &str, name: &str) -> Value {
        let response = self
            .post(
                &format!("/api/restaurants/{restaurant_id}/categories"),
                json!({ "name": name }),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        response.body
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}
