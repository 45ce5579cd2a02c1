use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::access;
use crate::domain::user::access::Operation;
use crate::domain::user::models::AccessToken;
use crate::inbound::http::router::AppState;

/// Exchange email and password for a bearer token.
///
/// Unknown email and wrong password produce the same 401 response.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AccessToken>, ApiError> {
    access::authorize(Operation::Login, None, None)?;

    state
        .user_service
        .login(&body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    email: String,
    password: String,
}
