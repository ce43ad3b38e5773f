pub mod todos;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::session::errors::SessionError;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoText;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PlaintextPassword;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::SessionGrant;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::AUTH_HEADER;
use crate::user::errors::UserError;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Success response that also hands a freshly issued token back in the
/// `x-auth` header.
#[derive(Debug)]
pub struct IssuedSession<T: Serialize + PartialEq> {
    token: String,
    body: ApiSuccess<T>,
}

impl IssuedSession<UserData> {
    pub fn new(status: StatusCode, grant: SessionGrant) -> Self {
        Self {
            body: ApiSuccess::new(status, UserData::from(&grant.user)),
            token: grant.token.as_str().to_string(),
        }
    }
}

impl<T: Serialize + PartialEq> IntoResponse for IssuedSession<T> {
    fn into_response(self) -> Response {
        let Ok(token) = HeaderValue::from_str(&self.token) else {
            return ApiError::InternalServerError("issued token is not a valid header value".to_string())
                .into_response();
        };

        let mut response = self.body.into_response();
        response.headers_mut().insert(AUTH_HEADER, token);
        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ValidationFailed(String),
    DuplicateCredential(String),
    InvalidCredentials,
    Unauthorized,
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::InternalServerError(detail) => {
                // Details stay in the log; clients get a generic message.
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
            ApiError::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, "validation_failed", msg),
            ApiError::DuplicateCredential(msg) => {
                (StatusCode::BAD_REQUEST, "duplicate_credential", msg)
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password".to_string(),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
        };

        (status, Json(ApiResponseBody::new_error(status, kind, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationFailed(rejection.body_text())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidEmail(_) | UserError::InvalidPassword(_) => {
                ApiError::ValidationFailed(err.to_string())
            }
            UserError::EmailAlreadyExists(_) => {
                ApiError::DuplicateCredential("Email is already registered".to_string())
            }
            UserError::InvalidCredentials => ApiError::InvalidCredentials,
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::Session(session_err) => session_err.into(),
            UserError::PasswordHashing(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidToken(_) | SessionError::RevokedOrUnknownToken => {
                ApiError::Unauthorized
            }
            SessionError::UserNotFound(_)
            | SessionError::SigningFailed(_)
            | SessionError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            // A malformed id cannot name any todo the caller owns.
            TodoError::InvalidTodoId(_) | TodoError::NotFound(_) => {
                ApiError::NotFound("Todo not found".to_string())
            }
            TodoError::InvalidText(_) => ApiError::ValidationFailed(err.to_string()),
            TodoError::DatabaseError(msg) => ApiError::InternalServerError(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, kind: &str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                kind: kind.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub kind: String,
    pub message: String,
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterUserRequest {
    email: String,
    password: String,
}

impl RegisterUserRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        // Validation happens here - errors are automatically converted via #[from]
        let email = EmailAddress::new(self.email)?;
        let password = PlaintextPassword::parse(self.password)?;
        Ok(RegisterUserCommand::new(email, password))
    }
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl From<LoginRequest> for LoginCommand {
    fn from(req: LoginRequest) -> Self {
        LoginCommand {
            email: req.email,
            password: PlaintextPassword::presented(req.password),
        }
    }
}

/// Public view of a user. Never includes the password hash or sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// Request DTO for creating a todo. Any owner field in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

impl CreateTodoRequest {
    fn try_into_command(self) -> Result<CreateTodoCommand, TodoError> {
        Ok(CreateTodoCommand {
            text: TodoText::new(self.text)?,
        })
    }
}

/// Request DTO for updating a todo
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    fn try_into_command(self) -> Result<UpdateTodoCommand, TodoError> {
        let text = self.text.map(TodoText::new).transpose()?;
        Ok(UpdateTodoCommand {
            text,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoData {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Todo> for TodoData {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            text: todo.text.as_str().to_string(),
            completed: todo.completed,
            completed_at: todo.completed_at,
            owner: todo.owner.to_string(),
            created_at: todo.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoListData {
    pub todos: Vec<TodoData>,
}
