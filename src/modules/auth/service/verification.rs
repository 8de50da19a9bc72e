use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;

use super::{Error, Result};
use crate::{
    modules::auth::repository::verification_code::{
        IssueVerificationCodePayload, VerificationCodeRepository,
    },
    types::Context,
};

pub const CODE_TTL_MINUTES: i64 = 10;

const CODE_SPACE: u32 = 1_000_000;
// Largest multiple of CODE_SPACE that fits in a u32; draws at or above it are
// rejected so every code is equally likely.
const CODE_DRAW_LIMIT: u32 = (u32::MAX / CODE_SPACE) * CODE_SPACE;

/// Six decimal digits, zero padded.
pub fn generate_code() -> Result<String> {
    loop {
        let mut bytes = [0u8; 4];
        OsRng.try_fill_bytes(&mut bytes).map_err(|err| {
            tracing::error!("Failed to generate verification code: {}", err);
            Error::UnexpectedError
        })?;

        let draw = u32::from_le_bytes(bytes);
        if draw < CODE_DRAW_LIMIT {
            return Ok(format!("{:06}", draw % CODE_SPACE));
        }
    }
}

/// Replaces any outstanding code for `email` and mails the new one.
///
/// Delivery problems are logged and otherwise ignored.
pub async fn issue(ctx: Arc<Context>, email: &str) -> Result<()> {
    let code = generate_code()?;

    ctx.db_conn
        .issue_verification_code(IssueVerificationCodePayload {
            email: email.to_string(),
            code: code.clone(),
            expires_at: Utc::now().naive_utc() + Duration::minutes(CODE_TTL_MINUTES),
        })
        .await
        .map_err(|_| Error::UnexpectedError)?;

    if let Err(err) = ctx.mailer.send_verification_code(email, &code).await {
        tracing::error!(
            "Failed to deliver verification code to {}: {:?}",
            email,
            err
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code().unwrap();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn draw_limit_is_a_whole_number_of_code_spaces() {
        assert_eq!(CODE_DRAW_LIMIT % CODE_SPACE, 0);
        assert!(CODE_DRAW_LIMIT > u32::MAX - CODE_SPACE);
    }
}
