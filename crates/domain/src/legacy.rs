//! Read-side translation of values written by older releases.
//!
//! Storage adapters call these functions when rebuilding domain values so the
//! workflow rules only ever see canonical roles, statuses and document keys.

use serde_json::Value;
use sika_core::AppResult;

use crate::coordinates::SiteCoordinates;
use crate::documents::{RelatedDocument, RelatedDocuments};
use crate::permit::PermitStatus;
use crate::user::Role;

const LEGACY_DOCUMENT_KEYS: [(&str, &str); 2] = [("l2ra", "ra"), ("confineSpace", "csep")];

/// Reads a stored role, mapping the retired `CC` role to site controller.
pub fn role_from_storage(value: &str) -> AppResult<Role> {
    match value {
        "CC" => Ok(Role::SiteController),
        other => other.parse(),
    }
}

/// Reads a stored status, mapping the retired `SUBMITTED` status to
/// `PENDING_AA_APPROVAL`.
pub fn status_from_storage(value: &str) -> AppResult<PermitStatus> {
    match value {
        "SUBMITTED" => Ok(PermitStatus::PendingAaApproval),
        other => other.parse(),
    }
}

/// Returns every stored value that reads back as `status`.
///
/// Conditional updates and status filters match on these so legacy rows stay
/// actionable.
#[must_use]
pub fn stored_status_values(status: PermitStatus) -> Vec<&'static str> {
    match status {
        PermitStatus::PendingAaApproval => vec![status.as_str(), "SUBMITTED"],
        _ => vec![status.as_str()],
    }
}

/// Reads the serialized related-documents mapping.
///
/// Legacy keys are renamed, unknown keys dropped and missing keys defaulted.
/// When both a legacy key and its canonical replacement exist, the canonical
/// entry wins. Unreadable payloads yield the empty default set.
#[must_use]
pub fn related_documents_from_storage(raw: Option<&str>) -> RelatedDocuments {
    let mut documents = RelatedDocuments::default();

    let Some(object) = raw
        .and_then(|text| serde_json::from_str::<Value>(text).ok())
        .and_then(|value| match value {
            Value::Object(object) => Some(object),
            _ => None,
        })
    else {
        return documents;
    };

    for (legacy_key, canonical_key) in LEGACY_DOCUMENT_KEYS {
        if let (Some(value), Some(slot)) = (object.get(legacy_key), documents.slot_mut(canonical_key)) {
            *slot = document_from_value(value);
        }
    }

    for key in RelatedDocuments::KEYS {
        if let (Some(value), Some(slot)) = (object.get(key), documents.slot_mut(key)) {
            *slot = document_from_value(value);
        }
    }

    documents
}

/// Reads stored coordinates leniently: missing or invalid text becomes `None`.
#[must_use]
pub fn coordinates_from_storage(raw: Option<&str>) -> Option<SiteCoordinates> {
    raw.filter(|text| !text.trim().is_empty())
        .and_then(|text| SiteCoordinates::parse(text).ok())
}

fn document_from_value(value: &Value) -> RelatedDocument {
    match value {
        Value::Bool(checked) => RelatedDocument {
            checked: *checked,
            number: String::new(),
        },
        Value::Object(object) => RelatedDocument {
            checked: object
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            number: match object.get("number") {
                Some(Value::String(number)) => number.clone(),
                Some(Value::Number(number)) => number.to_string(),
                _ => String::new(),
            },
        },
        _ => RelatedDocument::default(),
    }
}
