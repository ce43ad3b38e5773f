use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::models::CreateTodoCommand;
use super::models::Todo;
use super::models::TodoId;
use super::models::UpdateTodoCommand;
use super::ports::TodoRepository;
use super::ports::TodoServicePort;
use crate::domain::todo::errors::TodoError;
use crate::domain::user::models::UserId;

/// Concrete implementation of TodoServicePort.
///
/// Enforces ownership: the owner is stamped from the caller on create and
/// every other operation goes through an owner-scoped repository call.
pub struct TodoService<TR>
where
    TR: TodoRepository,
{
    repository: Arc<TR>,
}

impl<TR> TodoService<TR>
where
    TR: TodoRepository,
{
    /// Create a new todo service.
    ///
    /// # Arguments
    /// * `repository` - Todo persistence implementation
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TodoServicePort for TodoService<TR>
where
    TR: TodoRepository,
{
    async fn create_todo(
        &self,
        command: CreateTodoCommand,
        owner: &UserId,
    ) -> Result<Todo, TodoError> {
        let todo = Todo {
            id: TodoId::new(),
            owner: *owner,
            text: command.text,
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        };

        let created = self.repository.create(todo).await?;
        tracing::debug!(todo_id = %created.id, user_id = %owner, "Todo created");

        Ok(created)
    }

    async fn list_todos(&self, owner: &UserId) -> Result<Vec<Todo>, TodoError> {
        self.repository.find_by_owner(owner).await
    }

    async fn get_todo(&self, id: &TodoId, owner: &UserId) -> Result<Todo, TodoError> {
        self.repository
            .find_by_id_and_owner(id, owner)
            .await?
            .ok_or(TodoError::NotFound(id.to_string()))
    }

    async fn update_todo(
        &self,
        id: &TodoId,
        owner: &UserId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let changes = command.into_changes(Utc::now());

        self.repository
            .update_by_id_and_owner(id, owner, changes)
            .await?
            .ok_or(TodoError::NotFound(id.to_string()))
    }

    async fn delete_todo(&self, id: &TodoId, owner: &UserId) -> Result<Todo, TodoError> {
        let deleted = self
            .repository
            .delete_by_id_and_owner(id, owner)
            .await?
            .ok_or(TodoError::NotFound(id.to_string()))?;

        tracing::debug!(todo_id = %id, user_id = %owner, "Todo deleted");

        Ok(deleted)
    }
}
