use axum::Json;
use axum::extract::{Extension, Query, State};
use sika_core::UserIdentity;
use sika_domain::{Role, Zone};

use crate::dto::{DashboardParams, DashboardResponse, SiteMapParams, SiteMapResponse, parse_optional};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardResponse>> {
    let claimed_role = params.role.trim().parse::<Role>()?;
    let dashboard = state.permit_service.dashboard(&user, claimed_role).await?;

    Ok(Json(dashboard.into()))
}

pub async fn site_map_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<SiteMapParams>,
) -> ApiResult<Json<SiteMapResponse>> {
    let zone = parse_optional::<Zone>(params.zone.as_deref())?;
    let site_map = state.permit_service.site_map(&user, zone).await?;

    Ok(Json(site_map.into()))
}
