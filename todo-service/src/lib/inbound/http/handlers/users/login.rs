use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::IssuedSession;
use crate::inbound::http::handlers::LoginRequest;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<IssuedSession<UserData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .login(body.into())
        .await
        .map_err(ApiError::from)
        .map(|grant| IssuedSession::new(StatusCode::OK, grant))
}
