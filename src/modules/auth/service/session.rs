use base64::Engine;
use chrono::{Duration, NaiveDateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::{Error, Result};
use crate::{
    modules::{
        auth::repository::{
            session::{ActiveSession, SessionRepository},
            verification_code::{RedeemVerificationCodePayload, VerificationCodeRepository},
        },
        user::repository::User,
    },
    types::Context,
};

pub const SESSION_TTL_DAYS: i64 = 30;

pub struct SignedIn {
    pub token: String,
    pub user: User,
    pub expires_at: NaiveDateTime,
}

/// 256 random bits, URL-safe base64 without padding.
pub fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng.try_fill_bytes(&mut bytes).map_err(|err| {
        tracing::error!("Failed to generate session token: {}", err);
        Error::UnexpectedError
    })?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// What the session store keeps instead of the raw token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base16ct::lower::encode_string(&hasher.finalize())
}

/// Redeems a verification code and opens a session for its owner.
///
/// Wrong, reused and expired codes all fail with `InvalidOrExpiredCode`.
pub async fn sign_in_with_code(ctx: Arc<Context>, email: &str, code: &str) -> Result<SignedIn> {
    let token = generate_token()?;
    let now = Utc::now().naive_utc();
    let expires_at = now + Duration::days(SESSION_TTL_DAYS);

    let redeemed = ctx
        .db_conn
        .redeem_verification_code(RedeemVerificationCodePayload {
            email: email.to_string(),
            code: code.to_string(),
            now,
            session_token_hash: hash_token(&token),
            session_expires_at: expires_at,
        })
        .await
        .map_err(|_| Error::UnexpectedError)?
        .ok_or(Error::InvalidOrExpiredCode)?;

    tracing::info!("User {} signed in", redeemed.user.id);

    Ok(SignedIn {
        token,
        user: redeemed.user,
        expires_at: redeemed.session.expires_at,
    })
}

/// `Ok(None)` covers unknown, revoked and expired tokens alike.
pub async fn resolve(ctx: Arc<Context>, token: &str) -> Result<Option<ActiveSession>> {
    ctx.db_conn
        .find_active_session(&hash_token(token), Utc::now().naive_utc())
        .await
        .map_err(|_| Error::UnexpectedError)
}

/// Idempotent.
pub async fn revoke(ctx: Arc<Context>, token: &str) -> Result<()> {
    ctx.db_conn
        .delete_session_by_token_hash(&hash_token(token))
        .await
        .map_err(|_| Error::UnexpectedError)
}
