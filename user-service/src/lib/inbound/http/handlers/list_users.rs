use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::access;
use crate::domain::user::access::Operation;
use crate::domain::user::models::Page;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::PublicUser;
use crate::inbound::http::router::AppState;

/// `GET /api/users?page=&limit=&username=`
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<ApiSuccess<Page<PublicUser>>, ApiError> {
    access::authorize(Operation::ListUsers, None, None)?;

    state
        .user_service
        .paginate(params.into())
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListUsersParams {
    page: Option<i64>,
    limit: Option<i64>,
    username: Option<String>,
}

impl From<ListUsersParams> for PageRequest {
    fn from(params: ListUsersParams) -> Self {
        PageRequest::new(
            params.page.unwrap_or(PageRequest::DEFAULT_PAGE),
            params.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
            params.username,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::from(ListUsersParams::default());
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn test_explicit_params() {
        let request = PageRequest::from(ListUsersParams {
            page: Some(2),
            limit: Some(5),
            username: Some("ali".to_string()),
        });
        assert_eq!(request.page, 2);
        assert_eq!(request.limit, 5);
        assert_eq!(request.username.as_deref(), Some("ali"));
    }
}
