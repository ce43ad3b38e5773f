use async_trait::async_trait;

use crate::domain::session::models::Session;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::SessionGrant;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user and open its first session.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Created user with the freshly issued token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Password could not be hashed
    /// * `Session` - Token could not be issued
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<SessionGrant, UserError>;

    /// Verify credentials and open an additional session.
    ///
    /// # Arguments
    /// * `command` - Presented email and password
    ///
    /// # Returns
    /// The user with the freshly issued token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Session` - Token could not be issued
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<SessionGrant, UserError>;

    /// Close one session of a user.
    ///
    /// # Arguments
    /// * `user_id` - Owner of the session
    /// * `session` - The exact session entry to remove
    ///
    /// # Errors
    /// * `Session` - Removal failed
    async fn logout(&self, user_id: &UserId, session: &Session) -> Result<(), UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// User entity
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Session mutations are single atomic operations on the stored set; callers
/// never read, modify and write the whole set back.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier, sessions included.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email address.
    ///
    /// Only the credential is loaded; `sessions` is always empty.
    ///
    /// # Arguments
    /// * `email` - Email address
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Append a session to the end of a user's session set.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn add_session(&self, id: &UserId, session: &Session) -> Result<(), UserError>;

    /// Remove the entry equal to `session` from a user's session set.
    ///
    /// Removing an absent entry, or removing from an unknown user, is a no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn remove_session(&self, id: &UserId, session: &Session) -> Result<(), UserError>;

    /// Drop the oldest sessions beyond the newest `keep`.
    ///
    /// `current` is never dropped, even when sessions appended concurrently
    /// have pushed it out of the newest `keep`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn retain_latest_sessions(
        &self,
        id: &UserId,
        keep: usize,
        current: &Session,
    ) -> Result<(), UserError>;
}
