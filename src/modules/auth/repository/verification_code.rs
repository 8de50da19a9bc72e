use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::PgExecutor;
use ulid::Ulid;

use super::{
    session::{self, CreateSessionPayload, Session},
    Error, Result,
};
use crate::{
    modules::user::{self, repository::User},
    utils::database::{DatabaseConnection, MemoryDatabase},
};

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct VerificationCode {
    pub id: String,
    pub email: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

pub struct IssueVerificationCodePayload {
    pub email: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
}

pub struct RedeemVerificationCodePayload {
    pub email: String,
    pub code: String,
    pub now: NaiveDateTime,
    pub session_token_hash: String,
    pub session_expires_at: NaiveDateTime,
}

/// Outcome of a successful redemption: the now verified user and their new session.
pub struct Redeemed {
    pub user: User,
    pub session: Session,
}

#[async_trait]
pub trait VerificationCodeRepository {
    /// Replaces every code held for the email with the given one.
    async fn issue_verification_code(
        &self,
        payload: IssueVerificationCodePayload,
    ) -> Result<VerificationCode>;

    /// Consumes a live matching code, marks the email verified and opens a
    /// session, all or nothing. Returns `None` when no live code matches.
    async fn redeem_verification_code(
        &self,
        payload: RedeemVerificationCodePayload,
    ) -> Result<Option<Redeemed>>;

    async fn find_verification_codes_by_email(&self, email: &str)
        -> Result<Vec<VerificationCode>>;
}

pub async fn delete_by_email<'e, E: PgExecutor<'e>>(e: E, email: &str) -> Result<()> {
    sqlx::query("DELETE FROM verification_codes WHERE email = $1")
        .bind(email)
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while purging verification codes: {}", err);
            Error::UnexpectedError
        })
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: IssueVerificationCodePayload,
) -> Result<VerificationCode> {
    // A concurrent issuer may have inserted between our purge and this insert;
    // the unique email constraint turns that race into last-writer-wins.
    sqlx::query_as::<_, VerificationCode>(
        "
        INSERT INTO verification_codes (id, email, code, expires_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET
            id = EXCLUDED.id,
            code = EXCLUDED.code,
            expires_at = EXCLUDED.expires_at,
            created_at = NOW()
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.email)
    .bind(payload.code)
    .bind(payload.expires_at)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating verification code: {}", err);
        Error::UnexpectedError
    })
}

pub async fn consume<'e, E: PgExecutor<'e>>(
    e: E,
    email: &str,
    code: &str,
    now: NaiveDateTime,
) -> Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        "
        DELETE FROM verification_codes
        WHERE
            email = $1
            AND code = $2
            AND expires_at >= $3
        RETURNING id
        ",
    )
    .bind(email)
    .bind(code)
    .bind(now)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while consuming verification code: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(
    e: E,
    email: &str,
) -> Result<Vec<VerificationCode>> {
    sqlx::query_as::<_, VerificationCode>("SELECT * FROM verification_codes WHERE email = $1")
        .bind(email)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching verification codes: {}", err);
            Error::UnexpectedError
        })
}

#[async_trait]
impl VerificationCodeRepository for DatabaseConnection {
    async fn issue_verification_code(
        &self,
        payload: IssueVerificationCodePayload,
    ) -> Result<VerificationCode> {
        let mut tx = self.pool.begin().await.map_err(|err| {
            tracing::error!("Failed to start database transaction: {}", err);
            Error::UnexpectedError
        })?;

        delete_by_email(&mut *tx, &payload.email).await?;
        let verification_code = create(&mut *tx, payload).await?;

        tx.commit().await.map_err(|err| {
            tracing::error!("Failed to commit database transaction: {}", err);
            Error::UnexpectedError
        })?;

        Ok(verification_code)
    }

    async fn redeem_verification_code(
        &self,
        payload: RedeemVerificationCodePayload,
    ) -> Result<Option<Redeemed>> {
        let mut tx = self.pool.begin().await.map_err(|err| {
            tracing::error!("Failed to start database transaction: {}", err);
            Error::UnexpectedError
        })?;

        if consume(&mut *tx, &payload.email, &payload.code, payload.now)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let user = match user::repository::mark_email_verified(&mut *tx, &payload.email)
            .await
            .map_err(|_| Error::UnexpectedError)?
        {
            Some(user) => user,
            None => return Ok(None),
        };

        let session = session::create(
            &mut *tx,
            CreateSessionPayload {
                user_id: user.id.clone(),
                token_hash: payload.session_token_hash,
                expires_at: payload.session_expires_at,
            },
        )
        .await?;

        tx.commit().await.map_err(|err| {
            tracing::error!("Failed to commit database transaction: {}", err);
            Error::UnexpectedError
        })?;

        Ok(Some(Redeemed { user, session }))
    }

    async fn find_verification_codes_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<VerificationCode>> {
        find_by_email(&self.pool, email).await
    }
}

#[async_trait]
impl VerificationCodeRepository for MemoryDatabase {
    async fn issue_verification_code(
        &self,
        payload: IssueVerificationCodePayload,
    ) -> Result<VerificationCode> {
        let mut tables = self.tables.write().await;

        tables
            .verification_codes
            .retain(|c| c.email != payload.email);

        let verification_code = VerificationCode {
            id: Ulid::new().to_string(),
            email: payload.email,
            code: payload.code,
            expires_at: payload.expires_at,
            created_at: Utc::now().naive_utc(),
        };
        tables.verification_codes.push(verification_code.clone());

        Ok(verification_code)
    }

    async fn redeem_verification_code(
        &self,
        payload: RedeemVerificationCodePayload,
    ) -> Result<Option<Redeemed>> {
        let mut tables = self.tables.write().await;

        let Some(position) = tables.verification_codes.iter().position(|c| {
            c.email == payload.email && c.code == payload.code && c.expires_at >= payload.now
        }) else {
            return Ok(None);
        };

        let Some(user) = tables
            .users
            .iter_mut()
            .find(|u| u.email == payload.email)
        else {
            return Ok(None);
        };
        user.email_verified = true;
        user.updated_at = Some(Utc::now().naive_utc());
        let user = user.clone();

        tables.verification_codes.remove(position);

        let session = session::insert_in_memory(
            &mut tables.sessions,
            CreateSessionPayload {
                user_id: user.id.clone(),
                token_hash: payload.session_token_hash,
                expires_at: payload.session_expires_at,
            },
        );

        Ok(Some(Redeemed { user, session }))
    }

    async fn find_verification_codes_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<VerificationCode>> {
        let tables = self.tables.read().await;
        Ok(tables
            .verification_codes
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect())
    }
}
