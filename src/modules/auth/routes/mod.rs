mod login;
mod logout;
mod me;
mod request_code;
mod verify_code;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(request_code::get_router())
        .merge(login::get_router())
        .merge(verify_code::get_router())
        .merge(me::get_router())
        .merge(logout::get_router())
}
