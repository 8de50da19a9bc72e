pub mod email;

pub use email::{DisabledMailer, Mailer, SmtpConfig, SmtpMailer};

#[derive(Debug)]
pub enum Error {
    NotSent,
}

pub type Result<T> = std::result::Result<T, Error>;
