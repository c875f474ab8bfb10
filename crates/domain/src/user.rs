//! User domain types and validation rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sika_core::{AppError, AppResult, NonEmptyString};

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a stored numeric id.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Workflow role held by a user. Every user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Permit To Work Controller: creates and owns permits.
    #[serde(rename = "PTWC")]
    PermitController,
    /// Area Authority: first-stage approver.
    #[serde(rename = "AA")]
    AreaAuthority,
    /// Site Controller: second-stage approver.
    #[serde(rename = "SC")]
    SiteController,
    /// Administrator: sees everything, may act on any permit as owner.
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Returns the stable storage and transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermitController => "PTWC",
            Self::AreaAuthority => "AA",
            Self::SiteController => "SC",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns all canonical roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::PermitController,
            Role::AreaAuthority,
            Role::SiteController,
            Role::Admin,
        ];

        ALL
    }

    /// Returns whether the role may create, submit and delete permits.
    #[must_use]
    pub fn can_own_permits(&self) -> bool {
        matches!(self, Self::PermitController | Self::Admin)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PTWC" => Ok(Self::PermitController),
            "AA" => Ok(Self::AreaAuthority),
            "SC" => Ok(Self::SiteController),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated, lower-cased email address.
    ///
    /// Performs basic structural validation: non-empty, exactly one `@`,
    /// non-empty local part and a domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@' and a local part".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length (bounds Argon2 hashing cost).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

/// A persisted user as seen by workflow rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stored identifier.
    pub id: UserId,
    /// Display name.
    pub name: NonEmptyString,
    /// Login email.
    pub email: EmailAddress,
    /// Workflow role.
    pub role: Role,
}
