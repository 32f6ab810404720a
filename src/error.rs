//! Error types for the crate's boundaries.
//!
//! The window manager itself is total; only parsing user input, talking to
//! the oracle backend and owning the terminal can fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application `{0}`")]
pub struct ParseAppError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale `{0}` (expected `en` or `cn`)")]
pub struct ParseLocaleError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("query is empty")]
    EmptyQuery,
    #[error("deliberation backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = DesktopError> = std::result::Result<T, E>;
