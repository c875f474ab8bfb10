mod common;
mod permits;
mod views;

pub use common::{
    AuthLoginRequest, HealthResponse, NormalizeCoordinatesRequest, NormalizedCoordinatesResponse,
    UserIdentityResponse,
};
pub(crate) use permits::parse_optional;
pub use permits::{
    ApprovePermitRequest, CoordinatesResponse, PermitFieldsRequest, PermitListParams,
    PermitResponse, RejectPermitRequest, RelatedDocumentDto, RelatedDocumentsDto,
};
pub use views::{
    DashboardParams, DashboardResponse, DashboardStatsResponse, SiteMapParams, SiteMapResponse,
    SitePinResponse, StatusBreakdownResponse,
};
