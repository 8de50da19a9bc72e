pub mod session;
pub mod verification_code;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub type Result<T> = std::result::Result<T, Error>;
