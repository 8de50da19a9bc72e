use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::database::{DatabaseConnection, MemoryDatabase};

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub country: String,
    pub email_verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct UpsertUserPayload {
    pub email: String,
    pub full_name: String,
    pub country: String,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait UserRepository {
    /// Creates the user, or refreshes the profile fields of an existing one.
    async fn upsert_user(&self, payload: UpsertUserPayload) -> Result<User>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

pub async fn upsert<'e, E: PgExecutor<'e>>(e: E, payload: UpsertUserPayload) -> Result<User> {
    sqlx::query_as::<_, User>(
        "
        INSERT INTO users (id, email, full_name, country, email_verified)
        VALUES ($1, $2, $3, $4, false)
        ON CONFLICT (email) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            country = EXCLUDED.country,
            updated_at = NOW()
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.email)
    .bind(payload.full_name)
    .bind(payload.country)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while upserting a user: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching user with id {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(e: E, email: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching user by email: {}", err);
            Error::UnexpectedError
        })
}

pub async fn mark_email_verified<'e, E: PgExecutor<'e>>(
    e: E,
    email: &str,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "
        UPDATE users SET
            email_verified = true,
            updated_at = NOW()
        WHERE email = $1
        RETURNING *
        ",
    )
    .bind(email)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Failed to mark email as verified: {}", err);
        Error::UnexpectedError
    })
}

#[async_trait]
impl UserRepository for DatabaseConnection {
    async fn upsert_user(&self, payload: UpsertUserPayload) -> Result<User> {
        upsert(&self.pool, payload).await
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        find_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        find_by_email(&self.pool, email).await
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn upsert_user(&self, payload: UpsertUserPayload) -> Result<User> {
        let mut tables = self.tables.write().await;

        if let Some(user) = tables.users.iter_mut().find(|u| u.email == payload.email) {
            user.full_name = payload.full_name;
            user.country = payload.country;
            user.updated_at = Some(Utc::now().naive_utc());
            return Ok(user.clone());
        }

        let user = User {
            id: Ulid::new().to_string(),
            email: payload.email,
            full_name: payload.full_name,
            country: payload.country,
            email_verified: false,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}
