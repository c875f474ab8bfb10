use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sika_core::{AppError, UserIdentity};
use sika_domain::UserId;
use tower_sessions::Session;

use crate::dto::{AuthLoginRequest, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "user_identity";

async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let user = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let identity = UserIdentity::new(
        user.id.as_i64(),
        user.name.as_str(),
        user.email.as_str(),
    );

    // Fresh session id on every login.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(Json(user.into()))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    // Role changes take effect without a new login.
    let user = state
        .user_service
        .find_user(UserId::new(identity.user_id()))
        .await?;

    Ok(Json(user.into()))
}
