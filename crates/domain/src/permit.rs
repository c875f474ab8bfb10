//! Permit records and their descriptive fields.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sika_core::{AppError, AppResult, NonEmptyString};

use crate::coordinates::SiteCoordinates;
use crate::documents::RelatedDocuments;
use crate::user::UserId;

/// Unique identifier for a permit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermitId(i64);

impl PermitId {
    /// Creates a permit identifier from a stored numeric id.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PermitId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Coded physical area of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zone {
    /// Processing/production area.
    Prc,
    /// Utilities area.
    Utl,
    /// Building/office area.
    Bld,
    /// Gas metering station.
    Gms,
    /// Central control room.
    Ccr,
    /// Open yard.
    Oy,
    /// New building.
    Nbl,
    /// Workshop/warehouse.
    Ws,
}

impl Zone {
    /// Returns the stable zone code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prc => "PRC",
            Self::Utl => "UTL",
            Self::Bld => "BLD",
            Self::Gms => "GMS",
            Self::Ccr => "CCR",
            Self::Oy => "OY",
            Self::Nbl => "NBL",
            Self::Ws => "WS",
        }
    }

    /// Returns the human-readable area name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prc => "Processing/Production Area",
            Self::Utl => "Utilities Area",
            Self::Bld => "Building/Office Area",
            Self::Gms => "Gas Metering Station",
            Self::Ccr => "Central Control Room",
            Self::Oy => "Open Yard",
            Self::Nbl => "New Building",
            Self::Ws => "Workshop/Warehouse",
        }
    }

    /// Returns every zone in site-plan order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Zone] = &[
            Zone::Prc,
            Zone::Utl,
            Zone::Bld,
            Zone::Gms,
            Zone::Ccr,
            Zone::Oy,
            Zone::Nbl,
            Zone::Ws,
        ];

        ALL
    }
}

impl FromStr for Zone {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|zone| zone.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown zone '{value}'")))
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Hazard class of the planned work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    /// General cold work.
    ColdWork,
    /// Cold work that breaks containment.
    ColdWorkBreaking,
    /// Hot work producing sparks.
    HotWorkSpark,
    /// Hot work with open flame.
    HotWorkFlame,
}

impl WorkType {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColdWork => "COLD_WORK",
            Self::ColdWorkBreaking => "COLD_WORK_BREAKING",
            Self::HotWorkSpark => "HOT_WORK_SPARK",
            Self::HotWorkFlame => "HOT_WORK_FLAME",
        }
    }
}

impl FromStr for WorkType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "COLD_WORK" => Ok(Self::ColdWork),
            "COLD_WORK_BREAKING" => Ok(Self::ColdWorkBreaking),
            "HOT_WORK_SPARK" => Ok(Self::HotWorkSpark),
            "HOT_WORK_FLAME" => Ok(Self::HotWorkFlame),
            _ => Err(AppError::Validation(format!("unknown work type '{value}'"))),
        }
    }
}

/// Assessed risk of the planned work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Default when no assessment is given.
    #[default]
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
}

impl RiskLevel {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(AppError::Validation(format!("unknown risk level '{value}'"))),
        }
    }
}

/// Workflow status of a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermitStatus {
    /// Being prepared by its owner.
    Draft,
    /// Submitted and waiting for the area authority.
    PendingAaApproval,
    /// Approved by the area authority, waiting for the site controller.
    AaApproved,
    /// Waiting for the site controller.
    PendingScApproval,
    /// Approved by both stages. Only recorded as an audit value.
    FullyApproved,
    /// Live on site.
    Active,
    /// Rejected by the area authority.
    RejectedByAa,
    /// Rejected by the site controller.
    RejectedBySc,
    /// Work finished.
    Completed,
    /// Withdrawn.
    Cancelled,
}

impl PermitStatus {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::PendingAaApproval => "PENDING_AA_APPROVAL",
            Self::AaApproved => "AA_APPROVED",
            Self::PendingScApproval => "PENDING_SC_APPROVAL",
            Self::FullyApproved => "FULLY_APPROVED",
            Self::Active => "ACTIVE",
            Self::RejectedByAa => "REJECTED_BY_AA",
            Self::RejectedBySc => "REJECTED_BY_SC",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns every status.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermitStatus] = &[
            PermitStatus::Draft,
            PermitStatus::PendingAaApproval,
            PermitStatus::AaApproved,
            PermitStatus::PendingScApproval,
            PermitStatus::FullyApproved,
            PermitStatus::Active,
            PermitStatus::RejectedByAa,
            PermitStatus::RejectedBySc,
            PermitStatus::Completed,
            PermitStatus::Cancelled,
        ];

        ALL
    }

    /// Returns whether either approval stage rejected the permit.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::RejectedByAa | Self::RejectedBySc)
    }

    /// Returns whether the approval chain has reached an outcome. Only an
    /// `ACTIVE` permit moves on from here, by being completed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Active | Self::RejectedByAa | Self::RejectedBySc | Self::Completed | Self::Cancelled
        )
    }
}

impl FromStr for PermitStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permit status '{value}'")))
    }
}

impl std::fmt::Display for PermitStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Raw descriptive input for creating or editing a permit.
#[derive(Debug, Clone, PartialEq)]
pub struct PermitDraft {
    /// What will be done.
    pub work_description: String,
    /// Free-text location; defaults to the zone code.
    pub work_location: Option<String>,
    /// Site zone.
    pub zone: Zone,
    /// Hazard class.
    pub work_type: Option<WorkType>,
    /// Risk assessment; defaults to low.
    pub risk_level: Option<RiskLevel>,
    /// Planned start.
    pub start_date: DateTime<Utc>,
    /// Planned end.
    pub end_date: DateTime<Utc>,
    /// Site map position.
    pub coordinates: Option<SiteCoordinates>,
    /// Person performing the work.
    pub performing_authority: Option<String>,
    /// Contractor company.
    pub company: Option<String>,
    /// Responsible area authority name.
    pub area_authority: Option<String>,
    /// Responsible site controller name.
    pub site_controller_name: Option<String>,
    /// Safety measures in place.
    pub safety_measures: Option<String>,
    /// Attached safety documents.
    pub related_documents: RelatedDocuments,
}

/// Validated descriptive fields of a permit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermitDetails {
    work_description: String,
    work_location: String,
    zone: Zone,
    work_type: Option<WorkType>,
    risk_level: RiskLevel,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    coordinates: Option<SiteCoordinates>,
    performing_authority: Option<String>,
    company: Option<String>,
    area_authority: Option<String>,
    site_controller_name: Option<String>,
    safety_measures: Option<String>,
    related_documents: RelatedDocuments,
}

impl PermitDetails {
    /// Validates user input into permit details.
    pub fn new(draft: PermitDraft) -> AppResult<Self> {
        let work_description =
            NonEmptyString::for_field("workDescription", draft.work_description)?;

        if draft.end_date <= draft.start_date {
            return Err(AppError::Validation(
                "endDate must be after startDate".to_owned(),
            ));
        }

        draft.related_documents.validate()?;

        Ok(Self::from_stored(PermitDraft {
            work_description: work_description.into(),
            ..draft
        }))
    }

    /// Rebuilds details that were validated before being persisted.
    #[must_use]
    pub fn from_stored(draft: PermitDraft) -> Self {
        let work_location = optional_text(draft.work_location)
            .unwrap_or_else(|| draft.zone.as_str().to_owned());

        Self {
            work_description: draft.work_description.trim().to_owned(),
            work_location,
            zone: draft.zone,
            work_type: draft.work_type,
            risk_level: draft.risk_level.unwrap_or_default(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            coordinates: draft.coordinates,
            performing_authority: optional_text(draft.performing_authority),
            company: optional_text(draft.company),
            area_authority: optional_text(draft.area_authority),
            site_controller_name: optional_text(draft.site_controller_name),
            safety_measures: optional_text(draft.safety_measures),
            related_documents: draft.related_documents,
        }
    }

    /// Returns the work description.
    #[must_use]
    pub fn work_description(&self) -> &str {
        self.work_description.as_str()
    }

    /// Returns the free-text work location.
    #[must_use]
    pub fn work_location(&self) -> &str {
        self.work_location.as_str()
    }

    /// Returns the site zone.
    #[must_use]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Returns the hazard class, when given.
    #[must_use]
    pub fn work_type(&self) -> Option<WorkType> {
        self.work_type
    }

    /// Returns the risk level.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns the planned start.
    #[must_use]
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the planned end.
    #[must_use]
    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    /// Returns the site map position, when known.
    #[must_use]
    pub fn coordinates(&self) -> Option<SiteCoordinates> {
        self.coordinates
    }

    /// Returns the performing authority.
    #[must_use]
    pub fn performing_authority(&self) -> Option<&str> {
        self.performing_authority.as_deref()
    }

    /// Returns the contractor company.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the area authority name.
    #[must_use]
    pub fn area_authority(&self) -> Option<&str> {
        self.area_authority.as_deref()
    }

    /// Returns the site controller name.
    #[must_use]
    pub fn site_controller_name(&self) -> Option<&str> {
        self.site_controller_name.as_deref()
    }

    /// Returns the safety measures.
    #[must_use]
    pub fn safety_measures(&self) -> Option<&str> {
        self.safety_measures.as_deref()
    }

    /// Returns the attached safety documents.
    #[must_use]
    pub fn related_documents(&self) -> &RelatedDocuments {
        &self.related_documents
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Who approved a stage, when, and with which comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalRecord {
    /// Approving user.
    pub by: UserId,
    /// Approval time.
    pub at: DateTime<Utc>,
    /// Optional approver comment.
    pub comment: Option<String>,
}

/// Who rejected the permit, when, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionRecord {
    /// Rejecting user.
    pub by: UserId,
    /// Rejection time.
    pub at: DateTime<Utc>,
    /// Mandatory reason.
    pub reason: String,
}

/// A persisted permit with its workflow metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Permit {
    /// Stored identifier.
    pub id: PermitId,
    /// Human-readable number, `PERMIT-<yyyymmdd>-<nnnn>`.
    pub permit_number: String,
    /// Descriptive fields.
    pub details: PermitDetails,
    /// Workflow status.
    pub status: PermitStatus,
    /// Creating user.
    pub owner_id: UserId,
    /// Area authority approval.
    pub aa_approval: Option<ApprovalRecord>,
    /// Site controller approval.
    pub sc_approval: Option<ApprovalRecord>,
    /// Rejection at either stage.
    pub rejection: Option<RejectionRecord>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Formats a permit number from its creation date and sequence value.
#[must_use]
pub fn format_permit_number(date: NaiveDate, sequence: i64) -> String {
    format!("PERMIT-{}-{sequence:04}", date.format("%Y%m%d"))
}
