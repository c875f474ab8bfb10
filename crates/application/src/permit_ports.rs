use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sika_core::AppResult;
use sika_domain::{
    Permit, PermitDetails, PermitId, PermitStatus, Transition, UserId, Zone,
};

/// Storage-level filter for permit listings.
///
/// Empty `statuses` means any status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitListQuery {
    /// Restrict to permits created by this user.
    pub owner_id: Option<UserId>,
    /// Restrict to these statuses.
    pub statuses: Vec<PermitStatus>,
    /// Restrict to one zone.
    pub zone: Option<Zone>,
}

impl PermitListQuery {
    /// Returns whether a permit satisfies the filter.
    #[must_use]
    pub fn matches(&self, permit: &Permit) -> bool {
        self.owner_id.is_none_or(|owner_id| permit.owner_id == owner_id)
            && (self.statuses.is_empty() || self.statuses.contains(&permit.status))
            && self.zone.is_none_or(|zone| permit.details.zone() == zone)
    }
}

/// Repository port for permits.
///
/// Every mutation is conditional on the status the caller observed. A write
/// whose condition no longer holds changes nothing and reports `None`/`false`,
/// leaving the caller to decide between not-found and conflict.
#[async_trait]
pub trait PermitRepository: Send + Sync {
    /// Inserts a `DRAFT` permit and assigns its id and permit number.
    ///
    /// Permit numbers come from an atomic sequence and never repeat.
    async fn create_permit(
        &self,
        owner_id: UserId,
        details: PermitDetails,
        created_at: DateTime<Utc>,
    ) -> AppResult<Permit>;

    /// Returns one permit by id.
    async fn find_permit(&self, permit_id: PermitId) -> AppResult<Option<Permit>>;

    /// Lists permits matching the query, newest first.
    async fn list_permits(&self, query: PermitListQuery) -> AppResult<Vec<Permit>>;

    /// Replaces descriptive fields while the status is one of `expected`.
    async fn update_details(
        &self,
        permit_id: PermitId,
        expected: &[PermitStatus],
        details: PermitDetails,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>>;

    /// Writes a planned transition while the status is one of its expected statuses.
    async fn apply_transition(
        &self,
        permit_id: PermitId,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>>;

    /// Deletes a permit while its status is still `expected`.
    async fn delete_permit(&self, permit_id: PermitId, expected: PermitStatus) -> AppResult<bool>;
}
