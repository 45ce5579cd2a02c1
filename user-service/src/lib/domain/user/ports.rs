use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Page;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserQuery;
use crate::user::errors::UserError;

/// Port for user domain service operations.
///
/// Every method returns the public view; password hashes never cross it.
/// Authorization is the caller's job (see [`crate::user::access`]).
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user. The role is always `USER`.
    ///
    /// # Errors
    /// * `Validation` - Password is empty
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<PublicUser, UserError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    /// * `Unknown` - Token signing failed
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<PublicUser, UserError>;

    /// Retrieve every user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<PublicUser>, UserError>;

    /// Retrieve one page of users, optionally filtered by username substring.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn paginate(&self, request: PageRequest) -> Result<Page<PublicUser>, UserError>;

    /// Update non-privileged profile fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<PublicUser, UserError>;

    /// Change a user's role. Privileged; caller must have authorized it.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_role(&self, id: &UserId, role: Role) -> Result<PublicUser, UserError>;

    /// Record the stored profile image file name.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_profile_image(
        &self,
        id: &UserId,
        file_name: String,
    ) -> Result<PublicUser, UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations enforce username and email uniqueness atomically
/// (unique index or an equivalent locked compare-and-insert).
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user, assigning its id and creation time.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by (lowercase) email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve a window of users matching `query`, oldest first, together
    /// with the total number of matches.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_and_count(&self, query: &UserQuery) -> Result<(Vec<User>, u64), UserError>;

    /// Write the set fields of `changes` in one atomic step.
    ///
    /// # Returns
    /// The user after the write
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
