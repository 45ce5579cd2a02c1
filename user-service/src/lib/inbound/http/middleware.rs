use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::access::Actor;
use crate::domain::user::models::PublicUser;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Validates the bearer token and stores the resolved [`Actor`] in request extensions.
///
/// The role comes from the store, not the token, so role changes apply to
/// tokens issued before them.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims: auth::Claims<PublicUser> =
        state.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "JWT validation failed");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user = state
        .user_service
        .get_user(&claims.user.id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(user_id = %claims.user.id, "Token principal no longer exists");
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            other => ApiError::from(other),
        })?;

    req.extensions_mut().insert(Actor {
        id: user.id,
        role: user.role,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
