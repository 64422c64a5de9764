//! CLI error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A CDL pipeline failure (lex/parse/geometry error).
    #[error("{0}")]
    Command(String),

    /// A failure reading from stdin or writing an output file.
    #[error("{0}")]
    Other(String),
}

impl From<cdl_core::Error> for Error {
    fn from(e: cdl_core::Error) -> Self {
        Error::Command(e.to_string())
    }
}
