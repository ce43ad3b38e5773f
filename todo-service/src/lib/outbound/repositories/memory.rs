//! In-process repositories backing `database.backend = "memory"` and the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::session::models::Session;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoChanges;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-memory user store.
///
/// Every session mutation runs under a single write lock, so concurrent
/// appends for one user never overwrite each other.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).map(|u| User {
            sessions: Vec::new(),
            ..u.clone()
        }))
    }

    async fn add_session(&self, id: &UserId, session: &Session) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        user.sessions.push(session.clone());
        Ok(())
    }

    async fn remove_session(&self, id: &UserId, session: &Session) -> Result<(), UserError> {
        if let Some(user) = self.users.write().await.get_mut(id) {
            user.sessions.retain(|s| s != session);
        }
        Ok(())
    }

    async fn retain_latest_sessions(
        &self,
        id: &UserId,
        keep: usize,
        current: &Session,
    ) -> Result<(), UserError> {
        if let Some(user) = self.users.write().await.get_mut(id) {
            let excess = user.sessions.len().saturating_sub(keep);
            let mut index = 0;
            user.sessions.retain(|s| {
                let evict = index < excess && s.token != current.token;
                index += 1;
                !evict
            });
        }
        Ok(())
    }
}

/// In-memory todo store. Insertion order doubles as creation order.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, TodoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| &t.owner == owner).cloned().collect())
    }

    async fn find_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<Option<Todo>, TodoError> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .find(|t| &t.id == id && &t.owner == owner)
            .cloned())
    }

    async fn update_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, TodoError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter_mut()
            .find(|t| &t.id == id && &t.owner == owner)
            .map(|todo| {
                todo.apply(changes);
                todo.clone()
            }))
    }

    async fn delete_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<Option<Todo>, TodoError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|t| &t.id == id && &t.owner == owner)
            .map(|index| todos.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::session::models::AccessScope;
    use crate::domain::session::models::SessionToken;
    use crate::domain::todo::models::TodoText;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            sessions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn session(token: &str) -> Session {
        Session::new(AccessScope::Auth, SessionToken::new(token.to_string()))
    }

    fn todo(owner: UserId, text: &str) -> Todo {
        Todo {
            id: TodoId::new(),
            owner,
            text: TodoText::new(text.to_string()).unwrap(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("a@x.com")).await.unwrap();

        let result = repository.create(user("A@X.com")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_concurrent_session_appends_all_survive() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let stored = repository.create(user("a@x.com")).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repository = Arc::clone(&repository);
                let id = stored.id;
                tokio::spawn(async move {
                    repository
                        .add_session(&id, &session(&format!("token-{}", i)))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let found = repository.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.sessions.len(), 16);
    }

    #[tokio::test]
    async fn test_add_session_to_missing_user() {
        let repository = InMemoryUserRepository::new();

        let result = repository.add_session(&UserId::new(), &session("t")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_session_is_exact_and_idempotent() {
        let repository = InMemoryUserRepository::new();
        let stored = repository.create(user("a@x.com")).await.unwrap();

        repository.add_session(&stored.id, &session("one")).await.unwrap();
        repository.add_session(&stored.id, &session("two")).await.unwrap();

        repository.remove_session(&stored.id, &session("one")).await.unwrap();
        repository.remove_session(&stored.id, &session("one")).await.unwrap();

        let found = repository.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.sessions, vec![session("two")]);
    }

    #[tokio::test]
    async fn test_retain_latest_sessions_drops_oldest() {
        let repository = InMemoryUserRepository::new();
        let stored = repository.create(user("a@x.com")).await.unwrap();

        for token in ["one", "two", "three"] {
            repository.add_session(&stored.id, &session(token)).await.unwrap();
        }
        repository
            .retain_latest_sessions(&stored.id, 2, &session("three"))
            .await
            .unwrap();

        let found = repository.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.sessions, vec![session("two"), session("three")]);
    }

    #[tokio::test]
    async fn test_retain_latest_sessions_spares_current() {
        let repository = InMemoryUserRepository::new();
        let stored = repository.create(user("a@x.com")).await.unwrap();

        // "one" was appended by the pruning call; the others landed after it.
        for token in ["one", "two", "three"] {
            repository.add_session(&stored.id, &session(token)).await.unwrap();
        }
        repository
            .retain_latest_sessions(&stored.id, 1, &session("one"))
            .await
            .unwrap();

        let found = repository.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.sessions, vec![session("one"), session("three")]);
    }

    #[tokio::test]
    async fn test_find_by_email_skips_sessions() {
        let repository = InMemoryUserRepository::new();
        let stored = repository.create(user("a@x.com")).await.unwrap();
        repository.add_session(&stored.id, &session("one")).await.unwrap();

        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        let found = repository.find_by_email(&email).await.unwrap().unwrap();

        assert_eq!(found.id, stored.id);
        assert!(found.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_todo_lookups_are_owner_scoped() {
        let repository = InMemoryTodoRepository::new();
        let owner = UserId::new();
        let intruder = UserId::new();

        let created = repository.create(todo(owner, "mine")).await.unwrap();

        assert!(repository
            .find_by_id_and_owner(&created.id, &intruder)
            .await
            .unwrap()
            .is_none());
        assert!(repository
            .delete_by_id_and_owner(&created.id, &intruder)
            .await
            .unwrap()
            .is_none());
        assert!(repository.find_by_owner(&intruder).await.unwrap().is_empty());

        let deleted = repository
            .delete_by_id_and_owner(&created.id, &owner)
            .await
            .unwrap();
        assert_eq!(deleted, Some(created));
    }

    #[tokio::test]
    async fn test_todo_listing_keeps_creation_order() {
        let repository = InMemoryTodoRepository::new();
        let owner = UserId::new();

        for text in ["first", "second", "third"] {
            repository.create(todo(owner, text)).await.unwrap();
        }

        let texts: Vec<_> = repository
            .find_by_owner(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.text.as_str().to_string())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
