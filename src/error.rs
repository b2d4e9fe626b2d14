use std::{io, result};

use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

/// A failure that aborts a scan.
///
/// Unrecognized characters are not errors; they come back as
/// [`TokenKind::Error`](crate::token::TokenKind::Error) tokens.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("could not read source: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Io(e) => e,
        }
    }
}
