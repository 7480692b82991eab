use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed section header at {}:{line}", file.display())]
    MalformedHeader { file: PathBuf, line: usize },

    #[error("Too many sections (limit: {0})")]
    ResourceExhausted(usize),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Cannot store '{lvalue}': target is not {expected}")]
    TargetMismatch {
        lvalue: String,
        expected: &'static str,
    },

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
