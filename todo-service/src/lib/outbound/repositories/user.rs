use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::session::models::AccessScope;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionToken;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_sessions(&self, id: &UserId) -> Result<Vec<Session>, UserError> {
        let rows = sqlx::query(
            r#"
            SELECT access, token
            FROM user_sessions
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.iter().map(session_from_row).collect()
    }

    async fn with_sessions(&self, row: Option<PgRow>) -> Result<Option<User>, UserError> {
        match row {
            Some(r) => {
                let mut user = user_from_row(&r)?;
                user.sessions = self.load_sessions(&user.id).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, UserError> {
    Ok(User {
        id: UserId(column(row, "id")?),
        email: EmailAddress::new(column(row, "email")?)?,
        password_hash: column(row, "password_hash")?,
        sessions: Vec::new(),
        created_at: column(row, "created_at")?,
    })
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, UserError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| UserError::DatabaseError(e.to_string()))
}

fn session_from_row(row: &PgRow) -> Result<Session, UserError> {
    let access: String = column(row, "access")?;
    let access = access
        .parse::<AccessScope>()
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    Ok(Session::new(access, SessionToken::new(column(row, "token")?)))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        self.with_sessions(row).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn add_session(&self, id: &UserId, session: &Session) -> Result<(), UserError> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, access, token)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id.0)
        .bind(session.access.as_str())
        .bind(session.token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return UserError::NotFound(id.to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn remove_session(&self, id: &UserId, session: &Session) -> Result<(), UserError> {
        sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE user_id = $1 AND access = $2 AND token = $3
            "#,
        )
        .bind(id.0)
        .bind(session.access.as_str())
        .bind(session.token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn retain_latest_sessions(
        &self,
        id: &UserId,
        keep: usize,
        current: &Session,
    ) -> Result<(), UserError> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);

        let result = sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE user_id = $1
              AND token <> $3
              AND id NOT IN (
                  SELECT id
                  FROM user_sessions
                  WHERE user_id = $1
                  ORDER BY id DESC
                  LIMIT $2
              )
            "#,
        )
        .bind(id.0)
        .bind(keep)
        .bind(current.token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() > 0 {
            tracing::debug!(
                user_id = %id,
                evicted = result.rows_affected(),
                "Evicted oldest sessions"
            );
        }

        Ok(())
    }
}
