//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use sika_application::{NewUserRecord, UserCredentials, UserRepository};
use sika_core::{AppError, AppResult, NonEmptyString};
use sika_domain::{EmailAddress, User, UserId, legacy};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for UserCredentials {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        let id = UserId::new(row.id);
        let unreadable = |column: &str, error: AppError| {
            AppError::Internal(format!("user '{id}' has unreadable {column}: {error}"))
        };

        Ok(Self {
            user: User {
                id,
                name: NonEmptyString::new(row.name).map_err(|error| unreadable("name", error))?,
                email: EmailAddress::new(row.email)
                    .map_err(|error| unreadable("email", error))?,
                role: legacy::role_from_storage(&row.role)
                    .map_err(|error| unreadable("role", error))?,
            },
            password_hash: row.password_hash,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(|row| UserCredentials::try_from(row).map(|credentials| credentials.user))
            .transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> AppResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE LOWER(email) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(UserCredentials::try_from).transpose()
    }

    async fn create_user(&self, user: NewUserRecord) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, LOWER($2), $3, $4)
            RETURNING id, name, email, password_hash, role
            "#,
        )
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        UserCredentials::try_from(row).map(|credentials| credentials.user)
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an account with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
