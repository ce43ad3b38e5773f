use async_trait::async_trait;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoChanges;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::domain::user::models::UserId;

/// Port for todo domain service operations.
///
/// Every operation is scoped to `owner`; a todo belonging to someone else is
/// indistinguishable from one that does not exist.
#[async_trait]
pub trait TodoServicePort: Send + Sync + 'static {
    /// Create a todo owned by `owner`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_todo(&self, command: CreateTodoCommand, owner: &UserId)
        -> Result<Todo, TodoError>;

    /// List the owner's todos in creation order.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// Retrieve one of the owner's todos.
    ///
    /// # Errors
    /// * `NotFound` - Unknown id, or owned by another user
    /// * `DatabaseError` - Database operation failed
    async fn get_todo(&self, id: &TodoId, owner: &UserId) -> Result<Todo, TodoError>;

    /// Update one of the owner's todos.
    ///
    /// # Errors
    /// * `NotFound` - Unknown id, or owned by another user
    /// * `DatabaseError` - Database operation failed
    async fn update_todo(
        &self,
        id: &TodoId,
        owner: &UserId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Delete one of the owner's todos.
    ///
    /// # Returns
    /// The todo as it was before deletion
    ///
    /// # Errors
    /// * `NotFound` - Unknown id, or owned by another user
    /// * `DatabaseError` - Database operation failed
    async fn delete_todo(&self, id: &TodoId, owner: &UserId) -> Result<Todo, TodoError>;
}

/// Persistence operations for todo aggregate.
///
/// Lookups and mutations always match on both id and owner.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Persist new todo to storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// Retrieve every todo of an owner, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// Retrieve a todo by id and owner.
    ///
    /// # Returns
    /// Optional todo (None if not found or not owned)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<Option<Todo>, TodoError>;

    /// Apply changes to a todo matched by id and owner.
    ///
    /// # Returns
    /// Optional updated todo (None if not found or not owned)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn update_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, TodoError>;

    /// Delete a todo matched by id and owner.
    ///
    /// # Returns
    /// Optional deleted todo (None if not found or not owned)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<Option<Todo>, TodoError>;
}
