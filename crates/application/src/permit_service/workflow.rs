use chrono::Utc;
use tracing::info;

use sika_domain::{
    PermitDetails, PermitDraft, Role, Transition, authorize_create, authorize_delete,
    authorize_update, plan_approval, plan_cancel, plan_complete, plan_rejection, plan_submit,
};

use super::*;

impl PermitService {
    /// Creates a `DRAFT` permit owned by the caller.
    pub async fn create_permit(
        &self,
        identity: &UserIdentity,
        draft: PermitDraft,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        authorize_create(&actor)?;
        let details = PermitDetails::new(draft)?;

        let permit = self
            .permit_repository
            .create_permit(actor.id, details, Utc::now())
            .await?;

        info!(
            permit_id = %permit.id,
            permit_number = %permit.permit_number,
            actor_id = %actor.id,
            "permit created"
        );
        Ok(permit)
    }

    /// Edits a `DRAFT` permit's descriptive fields.
    pub async fn update_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
        draft: PermitDraft,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        let expected = authorize_update(&permit, &actor)?;
        let details = PermitDetails::new(draft)?;

        let Some(updated) = self
            .permit_repository
            .update_details(permit_id, expected, details, Utc::now())
            .await?
        else {
            return Err(self.lost_race(permit_id, "edited").await);
        };

        info!(permit_id = %permit_id, actor_id = %actor.id, "permit updated");
        Ok(updated)
    }

    /// Submits a draft for area authority approval.
    pub async fn submit_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        let transition = plan_submit(&permit, &actor)?;

        self.commit(permit_id, &transition, actor.id, "submitted")
            .await
    }

    /// Approves the permit at the stage of the claimed role.
    ///
    /// Site controller approval returns the permit already `ACTIVE`.
    pub async fn approve_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
        claimed_role: Role,
        comment: Option<&str>,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        let transition = plan_approval(&permit, &actor, claimed_role, comment, Utc::now())?;

        self.commit(permit_id, &transition, actor.id, "approved")
            .await
    }

    /// Rejects the permit at the stage of the claimed role.
    pub async fn reject_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
        claimed_role: Role,
        reason: &str,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        let transition = plan_rejection(&permit, &actor, claimed_role, reason, Utc::now())?;

        self.commit(permit_id, &transition, actor.id, "rejected")
            .await
    }

    /// Closes an `ACTIVE` permit once the work is done.
    pub async fn complete_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        let transition = plan_complete(&permit, &actor)?;

        self.commit(permit_id, &transition, actor.id, "completed")
            .await
    }

    /// Withdraws a permit that has not reached a terminal status.
    pub async fn cancel_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
    ) -> AppResult<Permit> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        let transition = plan_cancel(&permit, &actor)?;

        self.commit(permit_id, &transition, actor.id, "cancelled")
            .await
    }

    /// Deletes a permit that is not `ACTIVE`.
    pub async fn delete_permit(
        &self,
        identity: &UserIdentity,
        permit_id: PermitId,
    ) -> AppResult<()> {
        let actor = self.load_actor(identity).await?;
        let permit = self.load_permit(permit_id).await?;
        authorize_delete(&permit, &actor)?;

        if !self
            .permit_repository
            .delete_permit(permit_id, permit.status)
            .await?
        {
            return Err(self.lost_race(permit_id, "deleted").await);
        }

        info!(
            permit_id = %permit_id,
            actor_id = %actor.id,
            status = %permit.status,
            "permit deleted"
        );
        Ok(())
    }

    async fn commit(
        &self,
        permit_id: PermitId,
        transition: &Transition,
        actor_id: UserId,
        action: &str,
    ) -> AppResult<Permit> {
        let Some(permit) = self
            .permit_repository
            .apply_transition(permit_id, transition, Utc::now())
            .await?
        else {
            return Err(self.lost_race(permit_id, action).await);
        };

        info!(
            permit_id = %permit_id,
            actor_id = %actor_id,
            status = %permit.status,
            via = ?transition.passes_through(),
            "permit {action}"
        );
        Ok(permit)
    }
}
