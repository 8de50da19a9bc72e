pub mod session;
pub mod verification;

#[derive(Debug, PartialEq)]
pub enum Error {
    UnexpectedError,
    InvalidOrExpiredCode,
}

pub type Result<T> = std::result::Result<T, Error>;
