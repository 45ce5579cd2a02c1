use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserQuery;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, name, username, email, password_hash, role, profile_image, created_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(r.id),
            name: DisplayName::new(r.name)?,
            username: Username::new(r.username)?,
            email: EmailAddress::new(r.email)?,
            password_hash: r.password_hash,
            role: r.role.parse()?,
            profile_image: r.profile_image,
            created_at: r.created_at,
        })
    }
}

/// Translate unique-index violations into their domain errors.
fn map_write_error(e: sqlx::Error, username: Option<&str>, email: Option<&str>) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => {
                    return UserError::UsernameAlreadyExists(username.unwrap_or_default().to_string())
                }
                Some("users_email_key") => {
                    return UserError::EmailAlreadyExists(email.unwrap_or_default().to_string())
                }
                _ => {}
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, username, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.name.as_str())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                Some(user.username.as_str()),
                Some(user.email.as_str()),
            )
        })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at, id
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_and_count(&self, query: &UserQuery) -> Result<(Vec<User>, u64), UserError> {
        // strpos keeps the match a literal, case-sensitive substring test
        let filter = query.username_contains.as_deref();
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        // Page and total are read from one snapshot.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::TEXT IS NULL OR strpos(username, $1) > 0)
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::TEXT IS NULL OR strpos(username, $1) > 0)
            "#,
        )
        .bind(filter)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total.max(0) as u64))
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, UserError> {
        let username = changes.username.as_ref().map(Username::as_str);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                username = COALESCE($3, username),
                role = COALESCE($4, role),
                profile_image = COALESCE($5, profile_image)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(changes.name.as_ref().map(DisplayName::as_str))
        .bind(username)
        .bind(changes.role.map(|role| role.as_str()))
        .bind(changes.profile_image.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, username, None))?;

        row.ok_or_else(|| UserError::NotFound(id.to_string()))?
            .try_into()
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
