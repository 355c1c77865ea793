use thiserror::Error;

/// Errors surfaced by the matching engine to its callers.
///
/// Mirrors the error kinds named in the engine's design: configuration
/// problems are fatal at construction, backend I/O problems are surfaced
/// per-call with no partial results, and a posting value that fails to
/// decode is never silently dropped.
#[derive(Debug, Error)]
pub enum MatchError {
    /// An unknown option or an out-of-range value was supplied to
    /// [`crate::config::EngineConfig`]. Fatal at construction.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// An I/O or network failure occurred inside an [`crate::index::IndexStore`]
    /// backend call. Not retried internally.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A posting value read from a backend failed to deserialize.
    #[error("backend corrupt at key {key}: {reason}")]
    BackendCorrupt { key: String, reason: String },
}

impl From<redb::Error> for MatchError {
    fn from(err: redb::Error) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

impl From<redb::TransactionError> for MatchError {
    fn from(err: redb::TransactionError) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

impl From<redb::TableError> for MatchError {
    fn from(err: redb::TableError) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

impl From<redb::StorageError> for MatchError {
    fn from(err: redb::StorageError) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

impl From<redb::CommitError> for MatchError {
    fn from(err: redb::CommitError) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

impl From<redb::DatabaseError> for MatchError {
    fn from(err: redb::DatabaseError) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

#[cfg(feature = "http-backend")]
impl From<reqwest::Error> for MatchError {
    fn from(err: reqwest::Error) -> Self {
        MatchError::BackendUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
