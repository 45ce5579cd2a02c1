use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::access;
use crate::domain::user::access::Operation;
use crate::domain::user::models::PublicUser;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    access::authorize(Operation::GetUser, None, None)?;

    let user_id = parse_user_id(&user_id)?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user))
}
