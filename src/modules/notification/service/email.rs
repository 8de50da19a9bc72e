use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tokio::sync::OnceCell;

use super::{Error, Result};

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound mail used by the auth flow.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub sender: String,
}

/// Sends over STARTTLS. The transport is only built when the first mail goes out.
pub struct SmtpMailer {
    config: SmtpConfig,
    transport: OnceCell<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            transport: OnceCell::new(),
        }
    }

    async fn transport(&self) -> Result<&AsyncSmtpTransport<Tokio1Executor>> {
        self.transport
            .get_or_try_init(|| async {
                let mut builder =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                        .map_err(|err| {
                            tracing::error!("Failed to create mail transport: {}", err);
                            Error::NotSent
                        })?
                        .credentials(Credentials::new(
                            self.config.user.clone(),
                            self.config.password.clone(),
                        ))
                        .timeout(Some(SMTP_TIMEOUT));

                if let Some(port) = self.config.port {
                    builder = builder.port(port);
                }

                Ok(builder.build())
            })
            .await
    }
}

fn verification_code_body(code: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Email Verification</h2>
  <p>Your verification code is:</p>
  <div style="background-color: #f4f4f4; padding: 20px; text-align: center; font-size: 32px; font-weight: bold; letter-spacing: 5px; margin: 20px 0;">{code}</div>
  <p>This code will expire in 10 minutes.</p>
  <p>If you didn't request this code, please ignore this email.</p>
</div>"#
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<()> {
        let from = self.config.sender.parse::<Mailbox>().map_err(|err| {
            tracing::error!("Invalid mail sender address: {}", err);
            Error::NotSent
        })?;
        let to = email.parse::<Mailbox>().map_err(|err| {
            tracing::error!("Invalid recipient address: {}", err);
            Error::NotSent
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Your Verification Code")
            .header(ContentType::TEXT_HTML)
            .body(verification_code_body(code))
            .map_err(|err| {
                tracing::error!("Failed to build email: {}", err);
                Error::NotSent
            })?;

        self.transport()
            .await?
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| {
                tracing::error!("Failed to send email: {}", err);
                Error::NotSent
            })
    }
}

/// Stand-in used when no mail server is configured. The code only ends up in
/// the logs.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<()> {
        tracing::warn!("[EMAIL DISABLED] Verification code for {}: {}", email, code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_the_code() {
        let body = verification_code_body("042917");
        assert!(body.contains("042917"));
        assert!(body.contains("10 minutes"));
    }

    #[tokio::test]
    async fn disabled_mailer_never_fails() {
        assert!(DisabledMailer
            .send_verification_code("owner@example.com", "123456")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn rejects_malformed_recipient_before_connecting() {
        let mailer = SmtpMailer::new(SmtpConfig {
            host: String::from("localhost"),
            port: Some(2525),
            user: String::from("user"),
            password: String::from("password"),
            sender: String::from("Menus <menus@example.com>"),
        });

        assert!(mailer
            .send_verification_code("not an address", "123456")
            .await
            .is_err());
        assert!(mailer.transport.get().is_none());
    }
}
