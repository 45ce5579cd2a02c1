use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::access;
use crate::domain::user::access::Actor;
use crate::domain::user::access::Operation;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::Role;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// `PATCH /api/users/:user_id/role`, ADMIN only.
pub async fn update_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    let user_id = parse_user_id(&id)?;
    access::authorize(Operation::UpdateRole, Some(&actor), Some(&user_id))?;
    let role: Role = req.role.parse().map_err(UserError::from)?;

    state
        .user_service
        .update_role(&user_id, role)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user))
}
