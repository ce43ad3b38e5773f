use thiserror::Error;

use crate::user::errors::UserError;

/// Error for AccessScope parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessScopeError {
    #[error("Unknown access scope: {0}")]
    Unknown(String),
}

/// Top-level error for session issuance, verification and revocation.
///
/// `InvalidToken` and `RevokedOrUnknownToken` stay distinct here so the cause
/// can be logged; the HTTP boundary reports both as the same failure.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is revoked or unknown")]
    RevokedOrUnknownToken,

    #[error("Token signing failed: {0}")]
    SigningFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<UserError> for SessionError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => SessionError::UserNotFound(id),
            other => SessionError::DatabaseError(other.to_string()),
        }
    }
}
