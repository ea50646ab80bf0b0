use thiserror::Error;

/// Generic error type used by service layer functions.
///
/// Every variant is recoverable: failures are either absorbed by restoring
/// local state or surfaced so the caller can offer a retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not signed in; no remote call was issued.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested record does not exist (anymore).
    #[error("not found")]
    NotFound,
    /// The record has not been acknowledged by the remote authority yet.
    #[error("record is pending confirmation")]
    Pending,
    /// A mutation on the same record is still in flight.
    #[error("record is busy")]
    Busy,
    /// The remote call failed; local state was rolled back.
    #[error("remote error: {0}")]
    Remote(String),
    #[error("invalid data: {0}")]
    TypeConstraint(String),
    #[error("invalid form: {0}")]
    Form(String),
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
