//! Client error types.

use std::fmt;

use crate::api::FetchError;
use crate::blocks::InsertError;
use crate::journal::ContextError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// IO error.
    Io(std::io::Error),
    /// Fetching events or health from upstream failed.
    Fetch(FetchError),
    /// The invocation context is unusable.
    Context(ContextError),
    /// A block could not be inserted.
    Insert(InsertError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Fetch(err) => write!(f, "{}", err),
            Self::Context(err) => write!(f, "{}", err),
            Self::Insert(err) => write!(f, "block insertion failed: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Fetch(err) => Some(err),
            Self::Context(err) => Some(err),
            Self::Insert(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<FetchError> for ClientError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

impl From<ContextError> for ClientError {
    fn from(err: ContextError) -> Self {
        Self::Context(err)
    }
}

impl From<InsertError> for ClientError {
    fn from(err: InsertError) -> Self {
        Self::Insert(err)
    }
}
