pub mod repository;
mod routes;

pub use routes::{get_restaurant_router, get_router};
