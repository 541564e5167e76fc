//! Error types for the Libris core

use thiserror::Error;
use uuid::Uuid;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Authorization header is missing the `Bearer ` prefix or otherwise
    /// unusable. Raised before any token parsing happens.
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// Token signature, encoding or required claims failed verification,
    /// or the token is past its expiry.
    #[error("Invalid token")]
    InvalidToken,

    /// Token was valid but the subject is unknown or does not carry the
    /// required role.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Book with id={0} is not found")]
    BookNotFound(Uuid),

    #[error("Book '{0}' is not available")]
    BookNotAvailable(String),

    #[error("The maximum number of books that can be borrowed is {0}")]
    BorrowLimitExceeded(u32),

    /// The book is on loan, but to someone else.
    #[error("Book '{0}' is borrowed by another user")]
    NotCurrentBorrower(String),

    /// The book is not on loan at all.
    #[error("Book '{0}' is not currently borrowed")]
    NothingToReturn(String),

    /// Login failed. Deliberately does not say whether the account exists.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected internal failure. Surfaced generically to callers.
    #[error("Internal error: {0}")]
    Fault(String),
}

impl AppError {
    /// Whether this error is a client-input or business-rule problem, as
    /// opposed to an internal fault. Client errors are never retried.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AppError::Fault(_))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
