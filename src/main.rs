use menucard_backend_rs::{
    app::App,
    types::{Config, ToContext},
};
use std::{process::ExitCode, sync::Arc};
use tracing_subscriber::prelude::*;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let ctx = match Config::from_env() {
        Ok(config) => config.to_context().await,
        Err(err) => Err(err),
    };
    let ctx = match ctx {
        Ok(ctx) => Arc::new(ctx),
        Err(err) => {
            tracing::error!("Failed to start: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match App::new(ctx).serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Server stopped: {}", err);
            ExitCode::FAILURE
        }
    }
}
