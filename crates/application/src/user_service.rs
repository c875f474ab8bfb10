//! User ports and the login/registration service.
//!
//! Login failures are deliberately uniform: unknown email, malformed email
//! and wrong password all yield the same `Unauthorized` error, and a hash is
//! computed on every path.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use sika_core::{AppError, AppResult, NonEmptyString};
use sika_domain::{EmailAddress, Role, User, UserId, validate_password};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User plus stored credential, returned only to the login path.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// The user.
    pub user: User,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Input for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Display name.
    pub name: NonEmptyString,
    /// Login email.
    pub email: EmailAddress,
    /// Workflow role.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id. Stored legacy roles are already mapped.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Finds a user and credential by email.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> AppResult<Option<UserCredentials>>;

    /// Inserts a user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: NewUserRecord) -> AppResult<User>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for creating a user account.
#[derive(Debug, Clone)]
pub struct RegisterUserParams {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Workflow role.
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user authentication and account creation.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    /// Authenticates a user with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let Ok(email) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        let Some(credentials) = self
            .user_repository
            .find_credentials_by_email(&email)
            .await?
        else {
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, credentials.password_hash.as_str())?
        {
            return Err(invalid_credentials());
        }

        info!(user_id = %credentials.user.id, role = %credentials.user.role, "user logged in");
        Ok(credentials.user)
    }

    /// Creates a user account.
    pub async fn register_user(&self, params: RegisterUserParams) -> AppResult<User> {
        let name = NonEmptyString::for_field("name", params.name)?;
        let email = EmailAddress::new(params.email)?;
        validate_password(&params.password)?;

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self
            .user_repository
            .create_user(NewUserRecord {
                name,
                email,
                role: params.role,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Returns a user by id.
    pub async fn find_user(&self, user_id: UserId) -> AppResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid email or password".to_owned())
}
