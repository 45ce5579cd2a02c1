use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Page;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DUMMY_PASSWORD: &str = "dummy-password-never-matches";

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Hashing and verification run on the blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    /// Hash verified against when no account matches, so every rejected
    /// login pays for one bcrypt verification.
    dummy_hash: Arc<OnceLock<String>>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuing
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Run a full verification against a throwaway hash of the configured cost.
    async fn verify_against_dummy(&self, password: &str) {
        let authenticator = Arc::clone(&self.authenticator);
        let dummy_hash = Arc::clone(&self.dummy_hash);
        let password = password.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let hash = dummy_hash.get_or_init(|| {
                authenticator
                    .hash_password(DUMMY_PASSWORD)
                    .unwrap_or_default()
            });
            authenticator.verify_password(&password, hash)
        })
        .await;

        if let Err(e) = result {
            tracing::error!(error = %e, "Dummy verification task failed");
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<PublicUser, UserError> {
        if command.password.is_empty() {
            return Err(UserError::Validation("password must not be empty".to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let new_user = NewUser {
            name: command.name,
            username: command.username,
            email: command.email,
            password_hash,
            role: Role::User,
        };

        let created_user = self.repository.create(new_user).await.map_err(|e| {
            if e.is_duplicate_key() {
                tracing::info!(error = %e, "User creation rejected");
            }
            e
        })?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User created"
        );

        Ok(created_user.to_public())
    }

    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, UserError> {
        let Ok(email) = EmailAddress::new(email.to_string()) else {
            self.verify_against_dummy(password).await;
            tracing::warn!(reason = "malformed_email", "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        let Some(user) = self.repository.find_by_email(email.as_str()).await? else {
            self.verify_against_dummy(password).await;
            tracing::warn!(reason = "unknown_email", "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        let user_id = user.id;
        let principal = user.to_public();
        let stored_hash = user.password_hash;
        let password = password.to_string();
        let authenticator = Arc::clone(&self.authenticator);

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &principal)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Authentication task failed: {}", e)))?;

        match result {
            Ok(result) => {
                tracing::info!(user_id = %user_id, "User logged in");
                Ok(AccessToken {
                    access_token: result.access_token,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user_id, reason = "password_mismatch", "Login rejected");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => {
                Err(UserError::Unknown(format!("Token generation failed: {}", e)))
            }
        }
    }

    async fn get_user(&self, id: &UserId) -> Result<PublicUser, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<PublicUser>, UserError> {
        let users = self.repository.list_all().await?;
        Ok(users.iter().map(User::to_public).collect())
    }

    async fn paginate(&self, request: PageRequest) -> Result<Page<PublicUser>, UserError> {
        let (users, total) = self.repository.find_and_count(&request.to_query()).await?;
        let items = users.iter().map(User::to_public).collect();

        Ok(Page::new(items, total, &request))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<PublicUser, UserError> {
        let updated_user = self.repository.update(id, command.into()).await?;

        tracing::info!(user_id = %id, "User updated");

        Ok(updated_user.to_public())
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<PublicUser, UserError> {
        let updated_user = self.repository.update(id, UserChanges::role(role)).await?;

        tracing::info!(user_id = %id, role = %role, "User role changed");

        Ok(updated_user.to_public())
    }

    async fn update_profile_image(
        &self,
        id: &UserId,
        file_name: String,
    ) -> Result<PublicUser, UserError> {
        let updated_user = self
            .repository
            .update(id, UserChanges::profile_image(file_name))
            .await?;

        tracing::info!(user_id = %id, "Profile image updated");

        Ok(updated_user.to_public())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
