use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::access;
use crate::domain::user::access::Operation;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::UsernameError;

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    access::authorize(Operation::CreateUser, None, None)?;

    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::CREATED, user))
}

/// HTTP request body for creating a user (raw JSON).
///
/// Fields not listed here, `role` included, are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    name: String,
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] DisplayNameError),

    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let name = DisplayName::new(self.name)?;
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        Ok(CreateUserCommand::new(name, username, email, self.password))
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_in_payload_is_ignored() {
        let body: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Mallory",
            "username": "mallory",
            "email": "mallory@example.com",
            "password": "pw",
            "role": "ADMIN"
        }))
        .unwrap();

        let command = body.try_into_command().unwrap();
        assert_eq!(command.username.as_str(), "mallory");
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let body = CreateUserRequest {
            name: "Alice".to_string(),
            username: "alice".to_string(),
            email: "nope".to_string(),
            password: "pw".to_string(),
        };

        assert!(matches!(
            body.try_into_command(),
            Err(ParseCreateUserRequestError::Email(_))
        ));
    }
}
