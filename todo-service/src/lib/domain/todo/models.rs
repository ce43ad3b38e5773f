use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::todo::errors::TodoIdError;
use crate::domain::todo::errors::TodoTextError;
use crate::domain::user::models::UserId;

/// Todo aggregate root entity.
///
/// `owner` is stamped once at creation from the authenticated user and is
/// never part of any update.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub owner: UserId,
    pub text: TodoText,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Apply a set of derived changes in place.
    pub fn apply(&mut self, changes: TodoChanges) {
        if let Some(text) = changes.text {
            self.text = text;
        }
        self.completed = changes.completed;
        self.completed_at = changes.completed_at;
    }
}

/// Todo unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(pub Uuid);

impl TodoId {
    /// Generate a new random todo ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a todo ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TodoIdError> {
        Uuid::parse_str(s)
            .map(TodoId)
            .map_err(|e| TodoIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Todo text value object.
///
/// Surrounding whitespace is trimmed; the remainder must be non-empty and
/// at most 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoText(String);

impl TodoText {
    const MAX_LENGTH: usize = 1000;

    /// Create a new validated todo text.
    ///
    /// # Errors
    /// * `Empty` - Text is empty after trimming
    /// * `TooLong` - Text exceeds 1000 characters
    pub fn new(text: String) -> Result<Self, TodoTextError> {
        let text = text.trim();
        let length = text.chars().count();
        if length == 0 {
            Err(TodoTextError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TodoTextError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(text.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a todo. The owner comes from the caller's identity.
#[derive(Debug)]
pub struct CreateTodoCommand {
    pub text: TodoText,
}

/// Command to update a todo.
///
/// `completed` is tri-state on the wire but only `Some(true)` marks the todo
/// done; an absent flag counts as not completed.
#[derive(Debug, Default)]
pub struct UpdateTodoCommand {
    pub text: Option<TodoText>,
    pub completed: Option<bool>,
}

impl UpdateTodoCommand {
    /// Derive the stored changes for this update at time `now`.
    pub fn into_changes(self, now: DateTime<Utc>) -> TodoChanges {
        let completed = self.completed == Some(true);
        TodoChanges {
            text: self.text,
            completed,
            completed_at: completed.then_some(now),
        }
    }
}

/// Fully derived field values written by an update.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoChanges {
    pub text: Option<TodoText>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
