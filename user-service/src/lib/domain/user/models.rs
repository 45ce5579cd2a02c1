use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity as held by the store.
///
/// Carries the password hash, so it never leaves the domain layer;
/// callers receive a [`PublicUser`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build the externally visible view of this user.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.as_str().to_string(),
            username: self.username.as_str().to_string(),
            email: self.email.as_str().to_string(),
            role: self.role,
            profile_image: self.profile_image.clone(),
            created_at: self.created_at,
        }
    }
}

/// Externally visible user record.
///
/// Built field by field from [`User`]; there is no password field to strip.
/// Also used as the principal embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        user.to_public()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role label attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Mod,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Mod => "MOD",
            Role::User => "USER",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MOD" => Ok(Role::Mod),
            "USER" => Ok(Role::User),
            other => Err(RoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username value type. Unique, case-sensitive, surrounding whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Blank` - Empty after trimming
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = username.trim();
        if username.is_empty() {
            Err(UsernameError::Blank)
        } else {
            Ok(Self(username.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, lowercased email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type. Not unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 100;

    /// Create a display name, trimming surrounding whitespace.
    ///
    /// # Errors
    /// * `Blank` - Empty after trimming
    /// * `TooLong` - Longer than 100 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(DisplayNameError::Blank)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a new user with domain types.
///
/// There is deliberately no role field: new accounts are always `USER`.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `name` - Validated display name
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(
        name: DisplayName,
        username: Username,
        email: EmailAddress,
        password: String,
    ) -> Self {
        Self {
            name,
            username,
            email,
            password,
        }
    }
}

/// Generic partial update.
///
/// Only non-privileged profile fields can be expressed here; email,
/// password and role changes have no representation on this path.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub name: Option<DisplayName>,
    pub username: Option<Username>,
}

/// Record handed to the store for insertion. The store assigns id and creation time.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

/// Partial field set written atomically by the store.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<DisplayName>,
    pub username: Option<Username>,
    pub role: Option<Role>,
    pub profile_image: Option<String>,
}

impl UserChanges {
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn profile_image(path: String) -> Self {
        Self {
            profile_image: Some(path),
            ..Self::default()
        }
    }

    /// Apply the set fields to `user` in place.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(path) = &self.profile_image {
            user.profile_image = Some(path.clone());
        }
    }
}

impl From<UpdateUserCommand> for UserChanges {
    fn from(command: UpdateUserCommand) -> Self {
        Self {
            name: command.name,
            username: command.username,
            role: None,
            profile_image: None,
        }
    }
}

/// Store-level listing query: optional username filter plus a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub username_contains: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

/// 1-indexed page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub username: Option<String>,
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Build a page request, coercing `page` and `limit` to at least 1.
    /// An empty username filter counts as no filter.
    pub fn new(page: i64, limit: i64, username: Option<String>) -> Self {
        Self {
            page: page.max(1) as u64,
            limit: limit.max(1) as u64,
            username: username.filter(|u| !u.is_empty()),
        }
    }

    pub fn to_query(&self) -> UserQuery {
        UserQuery {
            username_contains: self.username.clone(),
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT, None)
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub item_count: u64,
    pub items_per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// One page of results plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: &PageRequest) -> Self {
        let meta = PageMeta {
            current_page: request.page,
            item_count: items.len() as u64,
            items_per_page: request.limit,
            total_items,
            total_pages: total_items.div_ceil(request.limit),
        };
        Self { items, meta }
    }
}

/// Bearer token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
}
