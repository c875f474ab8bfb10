use serde::{Deserialize, Serialize};
use sika_domain::{SiteCoordinates, User};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    #[ts(type = "number")]
    pub user_id: i64,
    pub name: String,
    pub email: String,
    /// Stored role; the UI picks its dashboard from this value.
    pub role: String,
}

impl From<User> for UserIdentityResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.as_i64(),
            name: user.name.into(),
            email: user.email.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
        }
    }
}

/// Coordinate input to normalize: a `"x,y"` / `"x;y"` / JSON string or an
/// `{x, y}` object.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/normalize-coordinates-request.ts"
)]
pub struct NormalizeCoordinatesRequest {
    #[ts(type = "string | { x: number, y: number } | null")]
    pub input: serde_json::Value,
}

/// Normalized coordinates and their canonical text form.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/normalized-coordinates-response.ts"
)]
pub struct NormalizedCoordinatesResponse {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl From<SiteCoordinates> for NormalizedCoordinatesResponse {
    fn from(value: SiteCoordinates) -> Self {
        Self {
            x: value.x(),
            y: value.y(),
            text: value.to_storage_string(),
        }
    }
}
