use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::session::models::AccessScope;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::SessionGrant;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Owns the credential pipeline (validate, hash, insert) and delegates token
/// lifecycle to the session service.
pub struct UserService<UR, SS>
where
    UR: UserRepository,
    SS: SessionServicePort,
{
    repository: Arc<UR>,
    sessions: Arc<SS>,
    authenticator: Arc<Authenticator>,
}

impl<UR, SS> UserService<UR, SS>
where
    UR: UserRepository,
    SS: SessionServicePort,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `sessions` - Session token lifecycle implementation
    /// * `authenticator` - Password hasher and token signer
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, sessions: Arc<SS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            sessions,
            authenticator,
        }
    }

    // Argon2 is CPU bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))?
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<(), UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let verdict = tokio::task::spawn_blocking(move || {
            authenticator.verify_credentials(&password, stored_hash.as_deref())
        })
        .await
        .map_err(|e| UserError::Unknown(e.to_string()))?;

        match verdict {
            Ok(()) => Ok(()),
            Err(AuthenticationError::InvalidCredentials) => Err(UserError::InvalidCredentials),
            Err(e) => Err(UserError::PasswordHashing(e.to_string())),
        }
    }
}

#[async_trait]
impl<UR, SS> UserServicePort for UserService<UR, SS>
where
    UR: UserRepository,
    SS: SessionServicePort,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<SessionGrant, UserError> {
        let password_hash = self
            .hash_password(command.password.expose().to_string())
            .await?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            sessions: Vec::new(),
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        let token = self
            .sessions
            .issue(&created_user.id, AccessScope::Auth)
            .await?;

        Ok(SessionGrant {
            user: created_user,
            token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<SessionGrant, UserError> {
        let user = match EmailAddress::new(command.email) {
            Ok(email) => self.repository.find_by_email(&email).await?,
            Err(_) => None,
        };

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        if let Err(e) = self
            .verify_password(command.password.expose().to_string(), stored_hash)
            .await
        {
            if matches!(e, UserError::InvalidCredentials) {
                tracing::warn!(reason = "invalid_credentials", "Login rejected");
            }
            return Err(e);
        }

        // verify_password only succeeds against a stored hash
        let user = user.ok_or(UserError::InvalidCredentials)?;

        let token = self.sessions.issue(&user.id, AccessScope::Auth).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(SessionGrant { user, token })
    }

    async fn logout(&self, user_id: &UserId, session: &Session) -> Result<(), UserError> {
        self.sessions.revoke(user_id, session).await?;
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
