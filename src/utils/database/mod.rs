pub(crate) mod memory;

pub use memory::MemoryDatabase;

use crate::modules::{
    auth::repository::{session::SessionRepository, verification_code::VerificationCodeRepository},
    category::repository::CategoryRepository,
    dish::repository::DishRepository,
    restaurant::repository::RestaurantRepository,
    user::repository::UserRepository,
};
use sqlx::{postgres::PgPoolOptions, PgPool};

pub const MEMORY_URL: &str = "memory://";

#[derive(Clone)]
pub struct DatabaseConnection {
    pub pool: PgPool,
}

/// Everything the request handlers need from storage.
pub trait Repository:
    UserRepository
    + VerificationCodeRepository
    + SessionRepository
    + RestaurantRepository
    + CategoryRepository
    + DishRepository
    + Send
    + Sync
{
}

impl<T> Repository for T where
    T: UserRepository
        + VerificationCodeRepository
        + SessionRepository
        + RestaurantRepository
        + CategoryRepository
        + DishRepository
        + Send
        + Sync
{
}

pub async fn connect(database_url: &str) -> Result<DatabaseConnection, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await
        .map(|pool| DatabaseConnection { pool })
        .map_err(|err| {
            tracing::error!("Error connecting to database: {}", err);
            err
        })
}

pub async fn migrate(db_conn: &DatabaseConnection) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(&db_conn.pool).await.map_err(|err| {
        tracing::error!("Failed to run database migrations: {}", err);
        err
    })
}
