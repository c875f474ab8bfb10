use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use sika_application::PermitFilter;
use sika_core::UserIdentity;
use sika_domain::{PermitDraft, PermitId, Role};

use crate::dto::{
    ApprovePermitRequest, PermitFieldsRequest, PermitListParams, PermitResponse,
    RejectPermitRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permits_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<PermitListParams>,
) -> ApiResult<Json<Vec<PermitResponse>>> {
    let filter = PermitFilter::try_from(params)?;
    let permits = state
        .permit_service
        .list_permits(&user, filter)
        .await?
        .into_iter()
        .map(PermitResponse::from)
        .collect();

    Ok(Json(permits))
}

pub async fn create_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<PermitFieldsRequest>,
) -> ApiResult<(StatusCode, Json<PermitResponse>)> {
    let draft = PermitDraft::try_from(payload)?;
    let permit = state.permit_service.create_permit(&user, draft).await?;

    Ok((StatusCode::CREATED, Json(permit.into())))
}

pub async fn get_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
) -> ApiResult<Json<PermitResponse>> {
    let permit = state
        .permit_service
        .get_permit(&user, PermitId::new(permit_id))
        .await?;

    Ok(Json(permit.into()))
}

pub async fn update_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
    Json(payload): Json<PermitFieldsRequest>,
) -> ApiResult<Json<PermitResponse>> {
    let draft = PermitDraft::try_from(payload)?;
    let permit = state
        .permit_service
        .update_permit(&user, PermitId::new(permit_id), draft)
        .await?;

    Ok(Json(permit.into()))
}

pub async fn delete_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .permit_service
        .delete_permit(&user, PermitId::new(permit_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
) -> ApiResult<Json<PermitResponse>> {
    let permit = state
        .permit_service
        .submit_permit(&user, PermitId::new(permit_id))
        .await?;

    Ok(Json(permit.into()))
}

pub async fn approve_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
    Json(payload): Json<ApprovePermitRequest>,
) -> ApiResult<Json<PermitResponse>> {
    let claimed_role = payload.role.trim().parse::<Role>()?;
    let permit = state
        .permit_service
        .approve_permit(
            &user,
            PermitId::new(permit_id),
            claimed_role,
            payload.comment.as_deref(),
        )
        .await?;

    Ok(Json(permit.into()))
}

pub async fn reject_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
    Json(payload): Json<RejectPermitRequest>,
) -> ApiResult<Json<PermitResponse>> {
    let claimed_role = payload.role.trim().parse::<Role>()?;
    let permit = state
        .permit_service
        .reject_permit(
            &user,
            PermitId::new(permit_id),
            claimed_role,
            payload.reason.as_str(),
        )
        .await?;

    Ok(Json(permit.into()))
}

pub async fn complete_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
) -> ApiResult<Json<PermitResponse>> {
    let permit = state
        .permit_service
        .complete_permit(&user, PermitId::new(permit_id))
        .await?;

    Ok(Json(permit.into()))
}

pub async fn cancel_permit_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permit_id): Path<i64>,
) -> ApiResult<Json<PermitResponse>> {
    let permit = state
        .permit_service
        .cancel_permit(&user, PermitId::new(permit_id))
        .await?;

    Ok(Json(permit.into()))
}
