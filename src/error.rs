use thiserror::Error;

/// Failures produced by the authentication gate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The `Authorization` header is missing or not `Bearer <token>`.
    #[error("Authentication required")]
    Unauthenticated,
    /// The token was well-formed and correctly signed but past its expiry.
    #[error("Token expired")]
    TokenExpired,
    /// Signature or structure verification failed, or the subject no longer
    /// resolves to a user.
    #[error("Invalid token")]
    InvalidToken,
}

/// Outcome channel for every guarded operation.
///
/// `Rejected` is the reported channel: the GraphQL layer turns it into a
/// `{success: false, message}` payload. All other variants are raised as
/// top-level errors in the response envelope.
#[derive(Debug, Error)]
pub enum OpError {
    /// Expected business failure, surfaced as a normal result.
    #[error("{0}")]
    Rejected(&'static str),
    /// Authentication-gate failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Role gate on the session mutations; aborts the operation outright.
    #[error("{0}")]
    Forbidden(&'static str),
    /// Persistence or hashing failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type OpResult<T> = Result<T, OpError>;
