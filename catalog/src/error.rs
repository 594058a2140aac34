use thiserror::Error;

use pokedex_protocol::ParseError;

/// Failure of an upstream fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, DNS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The requested resource does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// The source does not offer the requested operation
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<ParseError> for FetchError {
    fn from(err: ParseError) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Broad category of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Invariant,
    Storage,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An upstream fetch failed; the caller may retry
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A reference could not be resolved to an identifier
    #[error("Cannot resolve {reference:?}: {reason}")]
    Parse { reference: String, reason: String },

    /// The engine was misused; nothing was fetched
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The local favorites store could not be read or written
    #[error("Favorites storage error: {0}")]
    Storage(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Fetch(_) => ErrorKind::Fetch,
            CatalogError::Parse { .. } => ErrorKind::Parse,
            CatalogError::InvariantViolation(_) => ErrorKind::Invariant,
            CatalogError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Only fetch failures can succeed on a plain retry
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Fetch
    }
}
