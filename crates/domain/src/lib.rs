//! Domain types and rules for the SIKA permit-to-work workflow.
//!
//! Everything here is pure: no storage, no clocks, no I/O. Timestamps are
//! passed in by the application layer.

#![forbid(unsafe_code)]

mod approval;
mod coordinates;
mod dashboard;
mod documents;
pub mod legacy;
mod permit;
mod site_map;
mod user;

pub use approval::{
    Actor, ApprovalStage, Transition, TransitionEffect, authorize_create, authorize_delete,
    authorize_update, plan_approval, plan_cancel, plan_complete, plan_rejection, plan_submit,
    verify_claimed_role,
};
pub use coordinates::{COORDINATE_MAX, COORDINATE_MIN, SiteCoordinates};
pub use dashboard::{Dashboard, DashboardScope, DashboardStats, StatusBreakdown, dashboard_title};
pub use documents::{RelatedDocument, RelatedDocuments};
pub use permit::{
    ApprovalRecord, Permit, PermitDetails, PermitDraft, PermitId, PermitStatus, RejectionRecord,
    RiskLevel, WorkType, Zone, format_permit_number,
};
pub use site_map::{SiteMap, SitePhase, SitePin};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, Role, User, UserId, validate_password,
};
