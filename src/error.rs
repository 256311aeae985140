use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A CIDR string that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid CIDR format: `{0}`")]
    Shape(String),
    #[error("octet `{octet}` out of range in `{input}`")]
    Octet { input: String, octet: String },
    #[error("prefix length `{prefix}` out of range in `{input}`")]
    Prefix { input: String, prefix: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("CIDR list cannot be empty")]
    EmptyList,
    #[error("line {line}: {source}")]
    Line { line: usize, source: FormatError },
    #[error("cannot read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl Error {
    /// Bad CIDR text, either passed directly or read from a line.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_) | Error::Line { .. })
    }

    /// Nothing to aggregate.
    pub fn is_argument(&self) -> bool {
        matches!(self, Error::EmptyList)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
