use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserQuery;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Users are kept in insertion order, which doubles as creation order.
/// Uniqueness checks and writes happen under the same write lock.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(user: &User, filter: Option<&str>) -> bool {
    filter.map_or(true, |needle| user.username.as_str().contains(needle))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let created = User {
            id: UserId::new(),
            name: user.name,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            profile_image: None,
            created_at: Utc::now(),
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_and_count(&self, query: &UserQuery) -> Result<(Vec<User>, u64), UserError> {
        let users = self.users.read().await;
        let filter = query.username_contains.as_deref();

        let matching: Vec<&User> = users.iter().filter(|u| matches_filter(u, filter)).collect();
        let total = matching.len() as u64;

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let window = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok((window, total))
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if let Some(username) = &changes.username {
            if users.iter().any(|u| &u.username == username && &u.id != id) {
                return Err(UserError::UsernameAlreadyExists(
                    username.as_str().to_string(),
                ));
            }
        }

        let user = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        changes.apply_to(user);

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| &u.id != id);

        if users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
