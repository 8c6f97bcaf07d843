use std::io::Error as IoError;

use crate::section::SectionTag;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("patch conflict: {0}")]
    PatchConflict(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),
}

impl Error {
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFormat(msg.into())
    }

    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    pub fn patch_conflict<S: Into<String>>(msg: S) -> Self {
        Error::PatchConflict(msg.into())
    }

    pub fn out_of_memory<S: Into<String>>(msg: S) -> Self {
        Error::OutOfMemory(msg.into())
    }

    pub fn not_implemented(verb: &str, section: SectionTag) -> Self {
        Error::Unsupported(format!("can't {} {} section (not implemented)", verb, section))
    }
}
