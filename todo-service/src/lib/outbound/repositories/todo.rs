use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoChanges;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoText;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::UserId;

pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn todo_from_row(row: &PgRow) -> Result<Todo, TodoError> {
    let decode = |e: sqlx::Error| TodoError::DatabaseError(e.to_string());

    Ok(Todo {
        id: TodoId(row.try_get("id").map_err(decode)?),
        owner: UserId(row.try_get("owner_id").map_err(decode)?),
        text: TodoText::new(row.try_get("text").map_err(decode)?)?,
        completed: row.try_get("completed").map_err(decode)?,
        completed_at: row.try_get("completed_at").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        sqlx::query(
            r#"
            INSERT INTO todos (id, owner_id, text, completed, completed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.owner.0)
        .bind(todo.text.as_str())
        .bind(todo.completed)
        .bind(todo.completed_at)
        .bind(todo.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        Ok(todo)
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, text, completed, completed_at, created_at
            FROM todos
            WHERE owner_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn find_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, text, completed, completed_at, created_at
            FROM todos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn update_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query(
            r#"
            UPDATE todos
            SET text = COALESCE($3, text), completed = $4, completed_at = $5
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, text, completed, completed_at, created_at
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .bind(changes.text.as_ref().map(|t| t.as_str()))
        .bind(changes.completed)
        .bind(changes.completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn delete_by_id_and_owner(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, text, completed, completed_at, created_at
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.as_ref().map(todo_from_row).transpose()
    }
}
