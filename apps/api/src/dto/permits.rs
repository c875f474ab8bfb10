use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

pub(crate) use conversions::parse_optional;

/// One safety document checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/related-document.ts"
)]
pub struct RelatedDocumentDto {
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub number: String,
}

/// Safety documents attached to a permit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/related-documents.ts"
)]
pub struct RelatedDocumentsDto {
    #[serde(default)]
    pub jsa: RelatedDocumentDto,
    #[serde(default)]
    pub ra: RelatedDocumentDto,
    #[serde(default)]
    pub csep: RelatedDocumentDto,
    #[serde(default)]
    pub icc: RelatedDocumentDto,
    #[serde(default)]
    pub tki_tko: RelatedDocumentDto,
    #[serde(default)]
    pub other: RelatedDocumentDto,
}

/// Descriptive permit fields sent on create and update.
///
/// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permit-fields-request.ts"
)]
pub struct PermitFieldsRequest {
    pub work_description: String,
    pub work_location: Option<String>,
    pub zone: String,
    pub work_type: Option<String>,
    pub risk_level: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[ts(type = "string | { x: number, y: number } | null")]
    pub coordinates: Option<serde_json::Value>,
    pub performing_authority: Option<String>,
    pub company: Option<String>,
    pub area_authority: Option<String>,
    pub site_controller_name: Option<String>,
    pub safety_measures: Option<String>,
    #[serde(default)]
    pub related_documents: RelatedDocumentsDto,
}

/// Approval decision by the caller's stage.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/approve-permit-request.ts"
)]
pub struct ApprovePermitRequest {
    /// Must equal the caller's stored role.
    pub role: String,
    pub comment: Option<String>,
}

/// Rejection by the caller's stage.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/reject-permit-request.ts"
)]
pub struct RejectPermitRequest {
    /// Must equal the caller's stored role.
    pub role: String,
    #[serde(default)]
    pub reason: String,
}

/// Query string of the permit listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermitListParams {
    pub owner_id: Option<i64>,
    pub status: Option<String>,
    pub zone: Option<String>,
}

/// Site map position of a permit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/coordinates-response.ts"
)]
pub struct CoordinatesResponse {
    pub x: f64,
    pub y: f64,
}

/// API representation of a permit.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permit-response.ts"
)]
pub struct PermitResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub permit_number: String,
    pub work_description: String,
    pub work_location: String,
    pub zone: String,
    pub zone_label: String,
    pub work_type: Option<String>,
    pub risk_level: String,
    pub start_date: String,
    pub end_date: String,
    pub coordinates: Option<CoordinatesResponse>,
    pub performing_authority: Option<String>,
    pub company: Option<String>,
    pub area_authority: Option<String>,
    pub site_controller_name: Option<String>,
    pub safety_measures: Option<String>,
    pub related_documents: RelatedDocumentsDto,
    pub status: String,
    #[ts(type = "number")]
    pub owner_id: i64,
    #[ts(type = "number | null")]
    pub aa_approved_by: Option<i64>,
    pub aa_approved_at: Option<String>,
    pub aa_comments: Option<String>,
    #[ts(type = "number | null")]
    pub sc_approved_by: Option<i64>,
    pub sc_approved_at: Option<String>,
    pub sc_comments: Option<String>,
    #[ts(type = "number | null")]
    pub rejected_by: Option<i64>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
