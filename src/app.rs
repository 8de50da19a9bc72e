use crate::{modules, types::Context};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Extension, Router,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{cors, timeout, trace};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The full HTTP surface, mounted under `/api`.
pub fn router(ctx: Arc<Context>) -> Router {
    Router::new()
        .nest("/api", modules::get_router())
        .with_state(ctx.clone())
        .layer(Extension(ctx))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(trace::TraceLayer::new_for_http())
        .layer(timeout::TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
            cors::CorsLayer::new()
                .allow_methods([
                    Method::OPTIONS,
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(cors::Any),
        )
}

pub struct App {
    ctx: Arc<Context>,
    router: Router,
}

impl App {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self {
            router: router(ctx.clone()),
            ctx,
        }
    }

    pub async fn serve(self) -> std::io::Result<()> {
        let address = format!("{}:{}", self.ctx.app.host, self.ctx.app.port);
        let listener = TcpListener::bind(&address).await?;

        tracing::info!("App is running on {}", address);

        axum::serve(listener, self.router).await
    }
}
