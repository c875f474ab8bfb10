use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sika_application::PermitFilter;
use sika_core::{AppError, AppResult};
use sika_domain::{
    Permit, PermitDraft, RelatedDocument, RelatedDocuments, SiteCoordinates, UserId,
};

use super::{
    CoordinatesResponse, PermitFieldsRequest, PermitListParams, PermitResponse,
    RelatedDocumentDto, RelatedDocumentsDto,
};

/// Parses an optional enum field. Blank values count as absent.
pub(crate) fn parse_optional<T>(value: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<T>)
        .transpose()
}

fn parse_timestamp(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"
            ))
        })
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl TryFrom<PermitFieldsRequest> for PermitDraft {
    type Error = AppError;

    fn try_from(request: PermitFieldsRequest) -> AppResult<Self> {
        let zone = request.zone.trim().parse()?;
        let coordinates = match request.coordinates {
            None => None,
            Some(serde_json::Value::String(text)) if text.trim().is_empty() => None,
            Some(value) => Some(SiteCoordinates::from_value(&value)?),
        };

        Ok(Self {
            work_description: request.work_description,
            work_location: request.work_location,
            zone,
            work_type: parse_optional(request.work_type.as_deref())?,
            risk_level: parse_optional(request.risk_level.as_deref())?,
            start_date: parse_timestamp("startDate", &request.start_date)?,
            end_date: parse_timestamp("endDate", &request.end_date)?,
            coordinates,
            performing_authority: request.performing_authority,
            company: request.company,
            area_authority: request.area_authority,
            site_controller_name: request.site_controller_name,
            safety_measures: request.safety_measures,
            related_documents: request.related_documents.into(),
        })
    }
}

impl From<RelatedDocumentDto> for RelatedDocument {
    fn from(value: RelatedDocumentDto) -> Self {
        Self {
            checked: value.checked,
            number: value.number,
        }
    }
}

impl From<&RelatedDocument> for RelatedDocumentDto {
    fn from(value: &RelatedDocument) -> Self {
        Self {
            checked: value.checked,
            number: value.number.clone(),
        }
    }
}

impl From<RelatedDocumentsDto> for RelatedDocuments {
    fn from(value: RelatedDocumentsDto) -> Self {
        Self {
            jsa: value.jsa.into(),
            ra: value.ra.into(),
            csep: value.csep.into(),
            icc: value.icc.into(),
            tki_tko: value.tki_tko.into(),
            other: value.other.into(),
        }
    }
}

impl From<&RelatedDocuments> for RelatedDocumentsDto {
    fn from(value: &RelatedDocuments) -> Self {
        Self {
            jsa: (&value.jsa).into(),
            ra: (&value.ra).into(),
            csep: (&value.csep).into(),
            icc: (&value.icc).into(),
            tki_tko: (&value.tki_tko).into(),
            other: (&value.other).into(),
        }
    }
}

impl From<SiteCoordinates> for CoordinatesResponse {
    fn from(value: SiteCoordinates) -> Self {
        Self {
            x: value.x(),
            y: value.y(),
        }
    }
}

impl From<Permit> for PermitResponse {
    fn from(permit: Permit) -> Self {
        let details = &permit.details;
        let (aa_approved_by, aa_approved_at, aa_comments) = permit
            .aa_approval
            .map(|record| {
                (
                    Some(record.by.as_i64()),
                    Some(format_timestamp(record.at)),
                    record.comment,
                )
            })
            .unwrap_or_default();
        let (sc_approved_by, sc_approved_at, sc_comments) = permit
            .sc_approval
            .map(|record| {
                (
                    Some(record.by.as_i64()),
                    Some(format_timestamp(record.at)),
                    record.comment,
                )
            })
            .unwrap_or_default();
        let (rejected_by, rejected_at, rejection_reason) = permit
            .rejection
            .map(|record| {
                (
                    Some(record.by.as_i64()),
                    Some(format_timestamp(record.at)),
                    Some(record.reason),
                )
            })
            .unwrap_or_default();

        Self {
            id: permit.id.as_i64(),
            permit_number: permit.permit_number,
            work_description: details.work_description().to_owned(),
            work_location: details.work_location().to_owned(),
            zone: details.zone().as_str().to_owned(),
            zone_label: details.zone().label().to_owned(),
            work_type: details
                .work_type()
                .map(|work_type| work_type.as_str().to_owned()),
            risk_level: details.risk_level().as_str().to_owned(),
            start_date: format_timestamp(details.start_date()),
            end_date: format_timestamp(details.end_date()),
            coordinates: details.coordinates().map(CoordinatesResponse::from),
            performing_authority: details.performing_authority().map(ToOwned::to_owned),
            company: details.company().map(ToOwned::to_owned),
            area_authority: details.area_authority().map(ToOwned::to_owned),
            site_controller_name: details.site_controller_name().map(ToOwned::to_owned),
            safety_measures: details.safety_measures().map(ToOwned::to_owned),
            related_documents: details.related_documents().into(),
            status: permit.status.as_str().to_owned(),
            owner_id: permit.owner_id.as_i64(),
            aa_approved_by,
            aa_approved_at,
            aa_comments,
            sc_approved_by,
            sc_approved_at,
            sc_comments,
            rejected_by,
            rejected_at,
            rejection_reason,
            created_at: format_timestamp(permit.created_at),
            updated_at: format_timestamp(permit.updated_at),
        }
    }
}

impl TryFrom<PermitListParams> for PermitFilter {
    type Error = AppError;

    fn try_from(params: PermitListParams) -> AppResult<Self> {
        Ok(Self {
            owner_id: params.owner_id.map(UserId::new),
            status: parse_optional(params.status.as_deref())?,
            zone: parse_optional(params.zone.as_deref())?,
        })
    }
}
