use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sika_application::{PermitListQuery, PermitRepository};
use sika_core::AppResult;
use sika_domain::{
    Permit, PermitDetails, PermitId, PermitStatus, Transition, UserId, format_permit_number,
};
use tokio::sync::RwLock;

/// In-memory permit repository for local development and tests.
///
/// Conditional writes check the status under the write lock, so they behave
/// like the guarded `UPDATE` statements of the PostgreSQL adapter.
#[derive(Debug, Default)]
pub struct InMemoryPermitRepository {
    permits: RwLock<HashMap<PermitId, Permit>>,
    sequence: RwLock<i64>,
}

impl InMemoryPermitRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermitRepository for InMemoryPermitRepository {
    async fn create_permit(
        &self,
        owner_id: UserId,
        details: PermitDetails,
        created_at: DateTime<Utc>,
    ) -> AppResult<Permit> {
        let mut sequence = self.sequence.write().await;
        *sequence += 1;

        let permit = Permit {
            id: PermitId::new(*sequence),
            permit_number: format_permit_number(created_at.date_naive(), *sequence),
            details,
            status: PermitStatus::Draft,
            owner_id,
            aa_approval: None,
            sc_approval: None,
            rejection: None,
            created_at,
            updated_at: created_at,
        };

        self.permits.write().await.insert(permit.id, permit.clone());
        Ok(permit)
    }

    async fn find_permit(&self, permit_id: PermitId) -> AppResult<Option<Permit>> {
        Ok(self.permits.read().await.get(&permit_id).cloned())
    }

    async fn list_permits(&self, query: PermitListQuery) -> AppResult<Vec<Permit>> {
        let permits = self.permits.read().await;

        let mut values: Vec<Permit> = permits
            .values()
            .filter(|permit| query.matches(permit))
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });

        Ok(values)
    }

    async fn update_details(
        &self,
        permit_id: PermitId,
        expected: &[PermitStatus],
        details: PermitDetails,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>> {
        let mut permits = self.permits.write().await;
        let Some(permit) = permits
            .get_mut(&permit_id)
            .filter(|permit| expected.contains(&permit.status))
        else {
            return Ok(None);
        };

        permit.details = details;
        permit.updated_at = updated_at;
        Ok(Some(permit.clone()))
    }

    async fn apply_transition(
        &self,
        permit_id: PermitId,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>> {
        let mut permits = self.permits.write().await;
        let Some(permit) = permits
            .get_mut(&permit_id)
            .filter(|permit| transition.applies_to(permit.status))
        else {
            return Ok(None);
        };

        permit.apply(transition, at);
        Ok(Some(permit.clone()))
    }

    async fn delete_permit(&self, permit_id: PermitId, expected: PermitStatus) -> AppResult<bool> {
        let mut permits = self.permits.write().await;
        if permits.get(&permit_id).map(|permit| permit.status) != Some(expected) {
            return Ok(false);
        }

        Ok(permits.remove(&permit_id).is_some())
    }
}

#[cfg(test)]
mod tests;
