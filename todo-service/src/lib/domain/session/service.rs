use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::AccessScope;
use crate::domain::session::models::AuthenticatedPrincipal;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionToken;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Issues, verifies and revokes session tokens.
///
/// A token is accepted only if its signature checks out against the injected
/// secret *and* the identical `(access, token)` pair is still stored in the
/// owner's session set. Removing the pair is therefore enough to revoke an
/// otherwise valid token.
pub struct SessionService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    expiration_hours: i64,
    max_sessions: Option<usize>,
}

impl<UR> SessionService<UR>
where
    UR: UserRepository,
{
    /// Create a new session service.
    ///
    /// # Arguments
    /// * `repository` - User persistence holding the session sets
    /// * `authenticator` - Token signer/validator carrying the signing secret
    /// * `expiration_hours` - Lifetime of every issued token
    /// * `max_sessions` - Optional bound on stored sessions per user (at least 1)
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        expiration_hours: i64,
        max_sessions: Option<usize>,
    ) -> Self {
        Self {
            repository,
            authenticator,
            expiration_hours,
            max_sessions: max_sessions.map(|limit| limit.max(1)),
        }
    }

    fn decode(&self, token: &str) -> Result<(UserId, AccessScope), SessionError> {
        let claims: Claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        let subject = claims
            .sub
            .as_deref()
            .ok_or_else(|| SessionError::InvalidToken("missing subject".to_string()))?;
        let user_id =
            UserId::from_string(subject).map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        let access = claims
            .access()
            .ok_or_else(|| SessionError::InvalidToken("missing access scope".to_string()))?
            .parse::<AccessScope>()
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        Ok((user_id, access))
    }
}

#[async_trait]
impl<UR> SessionServicePort for SessionService<UR>
where
    UR: UserRepository,
{
    async fn issue(
        &self,
        user_id: &UserId,
        access: AccessScope,
    ) -> Result<SessionToken, SessionError> {
        let claims = Claims::for_session(user_id, access.as_str(), self.expiration_hours);
        let token = self
            .authenticator
            .generate_token(&claims)
            .map_err(|e| SessionError::SigningFailed(e.to_string()))?;

        let session = Session::new(access, SessionToken::new(token));
        self.repository.add_session(user_id, &session).await?;

        if let Some(limit) = self.max_sessions {
            // The new entry is already stored; failing to prune only leaves extra sessions behind.
            if let Err(e) = self
                .repository
                .retain_latest_sessions(user_id, limit, &session)
                .await
            {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to prune old sessions");
            }
        }

        tracing::info!(user_id = %user_id, access = %access, "Session issued");

        Ok(session.token)
    }

    async fn verify(&self, token: &str) -> Result<AuthenticatedPrincipal, SessionError> {
        let (user_id, access) = self.decode(token)?;
        let session = Session::new(access, SessionToken::new(token.to_string()));

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or(SessionError::RevokedOrUnknownToken)?;

        if !user.has_session(&session) {
            return Err(SessionError::RevokedOrUnknownToken);
        }

        Ok(AuthenticatedPrincipal { user, session })
    }

    async fn revoke(&self, user_id: &UserId, session: &Session) -> Result<(), SessionError> {
        self.repository.remove_session(user_id, session).await?;

        tracing::info!(user_id = %user_id, access = %session.access, "Session revoked");

        Ok(())
    }
}
