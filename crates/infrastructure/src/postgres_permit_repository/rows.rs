use sika_domain::{
    ApprovalRecord, PermitDraft, RejectionRecord, RiskLevel, WorkType, Zone,
};
use tracing::warn;

use super::*;

pub(super) const PERMIT_COLUMNS: &str = r#"
    id,
    permit_number,
    work_description,
    work_location,
    zone,
    work_type,
    risk_level,
    start_date,
    end_date,
    coordinates,
    performing_authority,
    company,
    area_authority,
    site_controller_name,
    safety_measures,
    related_documents,
    status,
    owner_id,
    aa_approved_by,
    aa_approved_at,
    aa_comments,
    sc_approved_by,
    sc_approved_at,
    sc_comments,
    rejected_by,
    rejected_at,
    rejection_reason,
    created_at,
    updated_at
"#;

#[derive(Debug, FromRow)]
pub(super) struct PermitRow {
    id: i64,
    permit_number: String,
    work_description: String,
    work_location: String,
    zone: String,
    work_type: Option<String>,
    risk_level: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    coordinates: Option<String>,
    performing_authority: Option<String>,
    company: Option<String>,
    area_authority: Option<String>,
    site_controller_name: Option<String>,
    safety_measures: Option<String>,
    related_documents: Option<String>,
    status: String,
    owner_id: i64,
    aa_approved_by: Option<i64>,
    aa_approved_at: Option<DateTime<Utc>>,
    aa_comments: Option<String>,
    sc_approved_by: Option<i64>,
    sc_approved_at: Option<DateTime<Utc>>,
    sc_comments: Option<String>,
    rejected_by: Option<i64>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PermitRow> for Permit {
    type Error = AppError;

    fn try_from(row: PermitRow) -> AppResult<Self> {
        let id = PermitId::new(row.id);
        let unreadable = |column: &str, error: AppError| {
            AppError::Internal(format!("permit '{id}' has unreadable {column}: {error}"))
        };

        let status = legacy::status_from_storage(&row.status)
            .map_err(|error| unreadable("status", error))?;
        let zone = row
            .zone
            .parse::<Zone>()
            .map_err(|error| unreadable("zone", error))?;
        let work_type = row
            .work_type
            .as_deref()
            .map(str::parse::<WorkType>)
            .transpose()
            .map_err(|error| unreadable("work type", error))?;
        let risk_level = row
            .risk_level
            .parse::<RiskLevel>()
            .map_err(|error| unreadable("risk level", error))?;

        let coordinates = legacy::coordinates_from_storage(row.coordinates.as_deref());
        if coordinates.is_none()
            && row
                .coordinates
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
        {
            warn!(permit_id = %id, "stored coordinates are unreadable; permit stays unplaced");
        }

        let details = PermitDetails::from_stored(PermitDraft {
            work_description: row.work_description,
            work_location: Some(row.work_location),
            zone,
            work_type,
            risk_level: Some(risk_level),
            start_date: row.start_date,
            end_date: row.end_date,
            coordinates,
            performing_authority: row.performing_authority,
            company: row.company,
            area_authority: row.area_authority,
            site_controller_name: row.site_controller_name,
            safety_measures: row.safety_measures,
            related_documents: legacy::related_documents_from_storage(
                row.related_documents.as_deref(),
            ),
        });

        Ok(Self {
            id,
            permit_number: row.permit_number,
            details,
            status,
            owner_id: UserId::new(row.owner_id),
            aa_approval: approval_record(row.aa_approved_by, row.aa_approved_at, row.aa_comments),
            sc_approval: approval_record(row.sc_approved_by, row.sc_approved_at, row.sc_comments),
            rejection: rejection_record(row.rejected_by, row.rejected_at, row.rejection_reason),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn approval_record(
    by: Option<i64>,
    at: Option<DateTime<Utc>>,
    comment: Option<String>,
) -> Option<ApprovalRecord> {
    Some(ApprovalRecord {
        by: UserId::new(by?),
        at: at?,
        comment,
    })
}

fn rejection_record(
    by: Option<i64>,
    at: Option<DateTime<Utc>>,
    reason: Option<String>,
) -> Option<RejectionRecord> {
    Some(RejectionRecord {
        by: UserId::new(by?),
        at: at?,
        reason: reason.unwrap_or_default(),
    })
}

/// Column values for the descriptive part of a permit.
pub(super) struct DetailsColumns<'a> {
    pub(super) work_description: &'a str,
    pub(super) work_location: &'a str,
    pub(super) zone: &'static str,
    pub(super) work_type: Option<&'static str>,
    pub(super) risk_level: &'static str,
    pub(super) start_date: DateTime<Utc>,
    pub(super) end_date: DateTime<Utc>,
    pub(super) coordinates: Option<String>,
    pub(super) performing_authority: Option<&'a str>,
    pub(super) company: Option<&'a str>,
    pub(super) area_authority: Option<&'a str>,
    pub(super) site_controller_name: Option<&'a str>,
    pub(super) safety_measures: Option<&'a str>,
    pub(super) related_documents: String,
}

pub(super) fn details_columns(details: &PermitDetails) -> AppResult<DetailsColumns<'_>> {
    let related_documents =
        serde_json::to_string(details.related_documents()).map_err(|error| {
            AppError::Internal(format!("failed to serialize related documents: {error}"))
        })?;

    Ok(DetailsColumns {
        work_description: details.work_description(),
        work_location: details.work_location(),
        zone: details.zone().as_str(),
        work_type: details.work_type().map(|work_type| work_type.as_str()),
        risk_level: details.risk_level().as_str(),
        start_date: details.start_date(),
        end_date: details.end_date(),
        coordinates: details
            .coordinates()
            .map(|coordinates| coordinates.to_storage_string()),
        performing_authority: details.performing_authority(),
        company: details.company(),
        area_authority: details.area_authority(),
        site_controller_name: details.site_controller_name(),
        safety_measures: details.safety_measures(),
        related_documents,
    })
}

/// Expands canonical statuses to every stored value that reads back as them.
pub(super) fn stored_statuses(statuses: &[PermitStatus]) -> Vec<String> {
    statuses
        .iter()
        .flat_map(|status| legacy::stored_status_values(*status))
        .map(str::to_owned)
        .collect()
}
