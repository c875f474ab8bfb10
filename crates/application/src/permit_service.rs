//! Permit workflow service.
//!
//! Each operation re-reads the acting user from storage, plans the change
//! with the domain rules and writes it through a conditional repository
//! call. Nothing about the caller's role is taken from the request except a
//! claim that must match the stored role.

use std::sync::Arc;

use sika_core::{AppError, AppResult, UserIdentity};
use sika_domain::{Actor, Permit, PermitId, PermitStatus, UserId, Zone};

use crate::permit_ports::PermitRepository;
use crate::user_service::UserRepository;

mod queries;
mod workflow;

/// Caller-facing filter for permit listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermitFilter {
    /// Only permits created by this user.
    pub owner_id: Option<UserId>,
    /// Only permits in this status.
    pub status: Option<PermitStatus>,
    /// Only permits in this zone.
    pub zone: Option<Zone>,
}

/// Application service for permit lifecycle, dashboards and the site map.
#[derive(Clone)]
pub struct PermitService {
    permit_repository: Arc<dyn PermitRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl PermitService {
    /// Creates a permit service.
    #[must_use]
    pub fn new(
        permit_repository: Arc<dyn PermitRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            permit_repository,
            user_repository,
        }
    }

    async fn load_actor(&self, identity: &UserIdentity) -> AppResult<Actor> {
        let user_id = UserId::new(identity.user_id());
        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(|user| Actor::from(&user))
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
    }

    async fn load_permit(&self, permit_id: PermitId) -> AppResult<Permit> {
        self.permit_repository
            .find_permit(permit_id)
            .await?
            .ok_or_else(|| permit_not_found(permit_id))
    }

    /// Explains why a conditional write matched no row.
    async fn lost_race(&self, permit_id: PermitId, action: &str) -> AppError {
        match self.permit_repository.find_permit(permit_id).await {
            Ok(Some(current)) => AppError::Conflict(format!(
                "permit {permit_id} changed to {} before it could be {action}",
                current.status
            )),
            Ok(None) => permit_not_found(permit_id),
            Err(error) => error,
        }
    }
}

fn permit_not_found(permit_id: PermitId) -> AppError {
    AppError::NotFound(format!("permit {permit_id} not found"))
}
