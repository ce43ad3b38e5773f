use async_trait::async_trait;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::AccessScope;
use crate::domain::session::models::AuthenticatedPrincipal;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionToken;
use crate::domain::user::models::UserId;

/// Port for session token lifecycle operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Mint a signed token for a user and append it to the user's session set.
    ///
    /// # Arguments
    /// * `user_id` - Owner of the new session
    /// * `access` - Scope the token authorizes
    ///
    /// # Returns
    /// The token string, only after it has been durably recorded
    ///
    /// # Errors
    /// * `SigningFailed` - Token could not be signed
    /// * `UserNotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn issue(&self, user_id: &UserId, access: AccessScope)
        -> Result<SessionToken, SessionError>;

    /// Resolve a presented token to its user.
    ///
    /// # Arguments
    /// * `token` - Raw token string as presented by the client
    ///
    /// # Returns
    /// The owning user and the matching session entry
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, badly signed or expired token
    /// * `RevokedOrUnknownToken` - Token is not in the owner's session set
    /// * `DatabaseError` - Database operation failed
    async fn verify(&self, token: &str) -> Result<AuthenticatedPrincipal, SessionError>;

    /// Remove one session entry from a user's session set.
    ///
    /// Revoking an entry that is not present succeeds without effect.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn revoke(&self, user_id: &UserId, session: &Session) -> Result<(), SessionError>;
}
