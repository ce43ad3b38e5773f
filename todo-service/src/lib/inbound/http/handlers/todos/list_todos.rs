use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::todo::ports::TodoServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TodoData;
use crate::inbound::http::handlers::TodoListData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<TodoListData>, ApiError> {
    let todos = state.todo_service.list_todos(&auth_user.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TodoListData {
            todos: todos.iter().map(TodoData::from).collect(),
        },
    ))
}
