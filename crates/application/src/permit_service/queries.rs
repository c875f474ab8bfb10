use chrono::Utc;
use sika_domain::{Dashboard, DashboardScope, Role, SiteMap, verify_claimed_role};

use crate::permit_ports::PermitListQuery;

use super::*;

impl PermitService {
    /// Returns one permit.
    pub async fn get_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
    ) -> AppResult<Permit> {
        self.load_actor(identity).await?;
        self.load_permit(permit_id).await
    }

    /// Lists permits, newest first.
    pub async fn list_permits(
        &self,
        identity: &UserIdentity,
        filter: PermitFilter,
    ) -> AppResult<Vec<Permit>> {
        self.load_actor(identity).await?;
        self.permit_repository
            .list_permits(PermitListQuery {
                owner_id: filter.owner_id,
                statuses: filter.status.into_iter().collect(),
                zone: filter.zone,
            })
            .await
    }

    /// Builds the dashboard for the caller's role.
    ///
    /// `claimed_role` must equal the caller's stored role.
    pub async fn dashboard(
        &self,
        identity: &UserIdentity,
        claimed_role: Role,
    ) -> AppResult<Dashboard> {
        let actor = self.load_actor(identity).await?;
        verify_claimed_role(&actor, claimed_role)?;

        let query = match DashboardScope::for_actor(&actor) {
            DashboardScope::OwnedBy(owner_id) => PermitListQuery {
                owner_id: Some(owner_id),
                ..PermitListQuery::default()
            },
            DashboardScope::AwaitingStage(statuses) => PermitListQuery {
                statuses: statuses.to_vec(),
                ..PermitListQuery::default()
            },
            DashboardScope::All => PermitListQuery::default(),
        };

        let permits = self.permit_repository.list_permits(query).await?;
        Ok(Dashboard::build(&actor, permits))
    }

    /// Returns pins for live permits, optionally for one zone.
    pub async fn site_map(&self, identity: &UserIdentity, zone: Option<Zone>) -> AppResult<SiteMap> {
        self.load_actor(identity).await?;

        let permits = self
            .permit_repository
            .list_permits(PermitListQuery {
                statuses: vec![PermitStatus::Active],
                zone,
                ..PermitListQuery::default()
            })
            .await?;

        Ok(SiteMap::from_permits(&permits, zone, Utc::now()))
    }
}
