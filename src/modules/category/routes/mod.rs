mod create;
mod delete;
mod list;
mod update;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

/// Mounted under `/restaurants/:id/categories`.
pub fn get_restaurant_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(create::get_router())
        .merge(list::get_router())
}

/// Mounted under `/categories`.
pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(update::get_router())
        .merge(delete::get_router())
}
