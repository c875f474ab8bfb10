use axum::Json;
use sika_domain::SiteCoordinates;

use crate::dto::{NormalizeCoordinatesRequest, NormalizedCoordinatesResponse};
use crate::error::ApiResult;

pub async fn normalize_coordinates_handler(
    Json(payload): Json<NormalizeCoordinatesRequest>,
) -> ApiResult<Json<NormalizedCoordinatesResponse>> {
    let coordinates = SiteCoordinates::from_value(&payload.input)?;
    Ok(Json(coordinates.into()))
}
