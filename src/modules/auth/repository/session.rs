use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::PgExecutor;
use ulid::Ulid;

use super::{Error, Result};
use crate::utils::database::{DatabaseConnection, MemoryDatabase};

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// A live session joined with the owner's email.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ActiveSession {
    pub user_id: String,
    pub email: String,
    pub expires_at: NaiveDateTime,
}

pub struct CreateSessionPayload {
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
}

#[async_trait]
pub trait SessionRepository {
    async fn create_session(&self, payload: CreateSessionPayload) -> Result<Session>;
    /// Unknown, revoked and expired tokens all come back as `None`.
    async fn find_active_session(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> Result<Option<ActiveSession>>;
    async fn delete_session_by_token_hash(&self, token_hash: &str) -> Result<()>;
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateSessionPayload) -> Result<Session> {
    sqlx::query_as::<_, Session>(
        "
        INSERT INTO sessions (id, user_id, token_hash, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(&payload.user_id)
    .bind(payload.token_hash)
    .bind(payload.expires_at)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating a new session for user with id {}: {}",
            payload.user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_active_by_token_hash<'e, E: PgExecutor<'e>>(
    e: E,
    token_hash: &str,
    now: NaiveDateTime,
) -> Result<Option<ActiveSession>> {
    sqlx::query_as::<_, ActiveSession>(
        "
        SELECT
            sessions.user_id,
            users.email,
            sessions.expires_at
        FROM
            sessions
            INNER JOIN users ON users.id = sessions.user_id
        WHERE
            sessions.token_hash = $1
            AND sessions.expires_at >= $2
        ",
    )
    .bind(token_hash)
    .bind(now)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching session: {}", err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_token_hash<'e, E: PgExecutor<'e>>(e: E, token_hash: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while deleting session: {}", err);
            Error::UnexpectedError
        })
}

#[async_trait]
impl SessionRepository for DatabaseConnection {
    async fn create_session(&self, payload: CreateSessionPayload) -> Result<Session> {
        create(&self.pool, payload).await
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> Result<Option<ActiveSession>> {
        find_active_by_token_hash(&self.pool, token_hash, now).await
    }

    async fn delete_session_by_token_hash(&self, token_hash: &str) -> Result<()> {
        delete_by_token_hash(&self.pool, token_hash).await
    }
}

pub(crate) fn insert_in_memory(
    sessions: &mut Vec<Session>,
    payload: CreateSessionPayload,
) -> Session {
    let session = Session {
        id: Ulid::new().to_string(),
        user_id: payload.user_id,
        token_hash: payload.token_hash,
        expires_at: payload.expires_at,
        created_at: Utc::now().naive_utc(),
    };
    sessions.push(session.clone());
    session
}

#[async_trait]
impl SessionRepository for MemoryDatabase {
    async fn create_session(&self, payload: CreateSessionPayload) -> Result<Session> {
        let mut tables = self.tables.write().await;
        Ok(insert_in_memory(&mut tables.sessions, payload))
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> Result<Option<ActiveSession>> {
        let tables = self.tables.read().await;

        Ok(tables
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash && s.expires_at >= now)
            .and_then(|session| {
                tables
                    .users
                    .iter()
                    .find(|u| u.id == session.user_id)
                    .map(|user| ActiveSession {
                        user_id: user.id.clone(),
                        email: user.email.clone(),
                        expires_at: session.expires_at,
                    })
            }))
    }

    async fn delete_session_by_token_hash(&self, token_hash: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.sessions.retain(|s| s.token_hash != token_hash);
        Ok(())
    }
}
