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
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for updating a user (raw JSON).
///
/// Only profile fields are read; `email`, `password` and `role` are dropped.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        let name = self.name.map(DisplayName::new).transpose()?;
        let username = self.username.map(Username::new).transpose()?;

        Ok(UpdateUserCommand { name, username })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    let user_id = parse_user_id(&id)?;
    access::authorize(Operation::UpdateUser, Some(&actor), Some(&user_id))?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_fields_are_dropped() {
        let req: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "New Name",
            "email": "evil@example.com",
            "role": "ADMIN",
            "password": "x"
        }))
        .unwrap();

        let command = req.try_into_command().unwrap();
        assert_eq!(command.name.unwrap().as_str(), "New Name");
        assert!(command.username.is_none());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let req = UpdateUserRequest {
            name: Some("  ".to_string()),
            username: None,
        };
        assert!(matches!(
            req.try_into_command(),
            Err(UserError::InvalidName(_))
        ));
    }
}
