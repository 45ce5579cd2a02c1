use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_user_id;
use crate::domain::user::access;
use crate::domain::user::access::Actor;
use crate::domain::user::access::Operation;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user_id = parse_user_id(&id)?;
    access::authorize(Operation::DeleteUser, Some(&actor), Some(&user_id))?;

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
