use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Header carrying the session token, both on requests and on issuing responses.
pub const AUTH_HEADER: &str = "x-auth";

/// Extension type to store the authenticated principal in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub session: Session,
}

/// Middleware that verifies the session token and adds the principal to request extensions.
///
/// Every rejection produces the same 401 body; the actual reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let principal = state
        .session_service
        .verify(&token)
        .await
        .map_err(|e| match e {
            SessionError::InvalidToken(_) | SessionError::RevokedOrUnknownToken => {
                tracing::warn!(reason = %e, "Authentication rejected");
                ApiError::Unauthorized
            }
            other => ApiError::from(other),
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: principal.user.id,
        email: principal.user.email,
        session: principal.session,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<String, ApiError> {
    let header = req.headers().get(AUTH_HEADER).ok_or_else(|| {
        tracing::warn!(reason = "missing x-auth header", "Authentication rejected");
        ApiError::Unauthorized
    })?;

    let token = header.to_str().map_err(|_| {
        tracing::warn!(reason = "non-ascii x-auth header", "Authentication rejected");
        ApiError::Unauthorized
    })?;

    Ok(token.to_string())
}
