use thiserror::Error;

/// Failures reported by the remote authority boundary.
///
/// Retries and timeouts are handled by the transport; by the time an error
/// reaches this layer it is final.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("remote authority unavailable: {0}")]
    Unavailable(String),
    #[error("remote request timed out")]
    Timeout,
    #[error("remote authority rejected the request: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
