//! Permit approval state machine.
//!
//! Every workflow action is planned here as a pure function of the current
//! permit and the acting user. A successful plan is a [`Transition`]: the
//! statuses the permit must still be in when the write happens, the resulting
//! status and the approval metadata to record. Storage adapters execute the
//! transition as a single conditional update, so two racing actors cannot both
//! succeed from the same observed status.
//!
//! | From | Action | Actor | To |
//! |---|---|---|---|
//! | `DRAFT` | submit | owner (PTWC) or ADMIN | `PENDING_AA_APPROVAL` |
//! | `PENDING_AA_APPROVAL` | approve | AA | `AA_APPROVED` |
//! | `PENDING_AA_APPROVAL` | reject | AA | `REJECTED_BY_AA` |
//! | `AA_APPROVED`, `PENDING_SC_APPROVAL` | approve | SC | `ACTIVE` (via `FULLY_APPROVED`) |
//! | `AA_APPROVED`, `PENDING_SC_APPROVAL` | reject | SC | `REJECTED_BY_SC` |
//! | `ACTIVE` | complete | owner (PTWC) or ADMIN | `COMPLETED` |
//! | any non-terminal status | cancel | owner (PTWC) or ADMIN | `CANCELLED` |

use chrono::{DateTime, Utc};
use sika_core::{AppError, AppResult, NonEmptyString};

use crate::permit::{ApprovalRecord, Permit, PermitStatus, RejectionRecord};
use crate::user::{Role, User, UserId};

const DRAFT_STAGE: &[PermitStatus] = &[PermitStatus::Draft];
const AREA_STAGE: &[PermitStatus] = &[PermitStatus::PendingAaApproval];
const SITE_STAGE: &[PermitStatus] = &[PermitStatus::AaApproved, PermitStatus::PendingScApproval];
const SITE_APPROVAL_AUDIT: &[PermitStatus] = &[PermitStatus::FullyApproved];
const LIVE_STAGE: &[PermitStatus] = &[PermitStatus::Active];
const CANCELLABLE: &[PermitStatus] = &[
    PermitStatus::Draft,
    PermitStatus::PendingAaApproval,
    PermitStatus::AaApproved,
    PermitStatus::PendingScApproval,
    PermitStatus::FullyApproved,
];

/// The authenticated user performing a workflow action, with the role read
/// from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Acting user.
    pub id: UserId,
    /// Persisted role of the acting user.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns whether the actor is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns whether the actor created the permit.
    #[must_use]
    pub fn owns(&self, permit: &Permit) -> bool {
        permit.owner_id == self.id
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Approval chain stage served by a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStage {
    /// First stage, served by the area authority.
    Area,
    /// Second stage, served by the site controller.
    Site,
}

impl ApprovalStage {
    /// Returns the stage a role may act on.
    pub fn for_role(role: Role) -> AppResult<Self> {
        match role {
            Role::AreaAuthority => Ok(Self::Area),
            Role::SiteController => Ok(Self::Site),
            Role::PermitController | Role::Admin => Err(AppError::Forbidden(format!(
                "role {role} cannot approve or reject permits; only AA or SC can"
            ))),
        }
    }

    /// Returns the statuses in which a permit waits for this stage.
    #[must_use]
    pub fn awaiting(&self) -> &'static [PermitStatus] {
        match self {
            Self::Area => AREA_STAGE,
            Self::Site => SITE_STAGE,
        }
    }

    fn rejected_status(&self) -> PermitStatus {
        match self {
            Self::Area => PermitStatus::RejectedByAa,
            Self::Site => PermitStatus::RejectedBySc,
        }
    }

    fn not_awaiting_message(&self, status: PermitStatus) -> String {
        match self {
            Self::Area => format!(
                "permit is {status}; only permits pending AA approval can be acted on by AA"
            ),
            Self::Site => format!(
                "permit is {status}; permit must be approved by AA first before SC can act on it"
            ),
        }
    }
}

/// Metadata recorded by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Owner submitted the draft.
    Submitted,
    /// Area authority approved.
    AreaApproved(ApprovalRecord),
    /// Site controller approved.
    SiteApproved(ApprovalRecord),
    /// A stage rejected the permit.
    Rejected(RejectionRecord),
    /// Owner closed a live permit after the work finished.
    Completed,
    /// Owner withdrew the permit before it went live.
    Cancelled,
}

/// A planned, authorized status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    expected: &'static [PermitStatus],
    to: PermitStatus,
    effect: TransitionEffect,
}

impl Transition {
    /// Statuses the permit must still hold when the change is written.
    #[must_use]
    pub fn expected(&self) -> &'static [PermitStatus] {
        self.expected
    }

    /// Resulting status.
    #[must_use]
    pub fn to(&self) -> PermitStatus {
        self.to
    }

    /// Metadata recorded by the change.
    #[must_use]
    pub fn effect(&self) -> &TransitionEffect {
        &self.effect
    }

    /// Intermediate statuses passed through on the way to [`Transition::to`].
    ///
    /// Site approval passes `FULLY_APPROVED` and lands on `ACTIVE` in the same
    /// write; the intermediate value exists for audit output only.
    #[must_use]
    pub fn passes_through(&self) -> &'static [PermitStatus] {
        match self.effect {
            TransitionEffect::SiteApproved(_) => SITE_APPROVAL_AUDIT,
            _ => &[],
        }
    }

    /// Returns whether a permit in `status` may take this transition.
    #[must_use]
    pub fn applies_to(&self, status: PermitStatus) -> bool {
        self.expected.contains(&status)
    }
}

impl Permit {
    /// Applies an authorized transition in place.
    ///
    /// Callers check [`Transition::applies_to`] against the current status
    /// first; this only writes the resulting fields.
    pub fn apply(&mut self, transition: &Transition, at: DateTime<Utc>) {
        self.status = transition.to;
        self.updated_at = at;

        match &transition.effect {
            TransitionEffect::Submitted
            | TransitionEffect::Completed
            | TransitionEffect::Cancelled => {}
            TransitionEffect::AreaApproved(record) => self.aa_approval = Some(record.clone()),
            TransitionEffect::SiteApproved(record) => self.sc_approval = Some(record.clone()),
            TransitionEffect::Rejected(record) => self.rejection = Some(record.clone()),
        }
    }
}

/// Checks that the actor may create permits.
pub fn authorize_create(actor: &Actor) -> AppResult<()> {
    if !actor.role.can_own_permits() {
        return Err(AppError::Forbidden(
            "only PTWC or ADMIN can create permits".to_owned(),
        ));
    }

    Ok(())
}

/// Checks a role named in a request against the actor's persisted role.
pub fn verify_claimed_role(actor: &Actor, claimed: Role) -> AppResult<()> {
    if claimed != actor.role {
        return Err(AppError::Forbidden(format!(
            "claimed role {claimed} does not match your role {}",
            actor.role
        )));
    }

    Ok(())
}

/// Plans `DRAFT -> PENDING_AA_APPROVAL`.
pub fn plan_submit(permit: &Permit, actor: &Actor) -> AppResult<Transition> {
    if !actor.role.can_own_permits() {
        return Err(AppError::Forbidden(
            "only PTWC can submit permits for approval".to_owned(),
        ));
    }

    if !actor.owns(permit) && !actor.is_admin() {
        return Err(AppError::Forbidden(
            "you can only submit your own permits".to_owned(),
        ));
    }

    if !DRAFT_STAGE.contains(&permit.status) {
        return Err(AppError::Conflict(format!(
            "permit is {}; only draft permits can be submitted",
            permit.status
        )));
    }

    Ok(Transition {
        expected: DRAFT_STAGE,
        to: PermitStatus::PendingAaApproval,
        effect: TransitionEffect::Submitted,
    })
}

/// Plans `ACTIVE -> COMPLETED` once the work is done.
pub fn plan_complete(permit: &Permit, actor: &Actor) -> AppResult<Transition> {
    authorize_owner_action(permit, actor, "complete")?;

    if !LIVE_STAGE.contains(&permit.status) {
        return Err(AppError::Conflict(format!(
            "permit is {}; only active permits can be completed",
            permit.status
        )));
    }

    Ok(Transition {
        expected: LIVE_STAGE,
        to: PermitStatus::Completed,
        effect: TransitionEffect::Completed,
    })
}

/// Plans a withdrawal of a permit that has not reached a terminal status.
pub fn plan_cancel(permit: &Permit, actor: &Actor) -> AppResult<Transition> {
    authorize_owner_action(permit, actor, "cancel")?;

    if permit.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "permit is {}; it can no longer be cancelled",
            permit.status
        )));
    }

    Ok(Transition {
        expected: CANCELLABLE,
        to: PermitStatus::Cancelled,
        effect: TransitionEffect::Cancelled,
    })
}

fn authorize_owner_action(permit: &Permit, actor: &Actor, action: &str) -> AppResult<()> {
    if !actor.role.can_own_permits() {
        return Err(AppError::Forbidden(format!(
            "only PTWC or ADMIN can {action} permits"
        )));
    }

    if !actor.owns(permit) && !actor.is_admin() {
        return Err(AppError::Forbidden(format!(
            "you can only {action} your own permits"
        )));
    }

    Ok(())
}

/// Plans an approval by the stage matching `claimed`.
pub fn plan_approval(
    permit: &Permit,
    actor: &Actor,
    claimed: Role,
    comment: Option<&str>,
    at: DateTime<Utc>,
) -> AppResult<Transition> {
    verify_claimed_role(actor, claimed)?;
    let stage = ApprovalStage::for_role(claimed)?;
    ensure_awaiting(permit, stage)?;

    let record = ApprovalRecord {
        by: actor.id,
        at,
        comment: comment
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned),
    };

    Ok(match stage {
        ApprovalStage::Area => Transition {
            expected: AREA_STAGE,
            to: PermitStatus::AaApproved,
            effect: TransitionEffect::AreaApproved(record),
        },
        ApprovalStage::Site => Transition {
            expected: SITE_STAGE,
            to: PermitStatus::Active,
            effect: TransitionEffect::SiteApproved(record),
        },
    })
}

/// Plans a rejection by the stage matching `claimed`.
///
/// Earlier approval fields are left as they are.
pub fn plan_rejection(
    permit: &Permit,
    actor: &Actor,
    claimed: Role,
    reason: &str,
    at: DateTime<Utc>,
) -> AppResult<Transition> {
    let reason = NonEmptyString::for_field("reason", reason)?;
    verify_claimed_role(actor, claimed)?;
    let stage = ApprovalStage::for_role(claimed)?;
    ensure_awaiting(permit, stage)?;

    Ok(Transition {
        expected: stage.awaiting(),
        to: stage.rejected_status(),
        effect: TransitionEffect::Rejected(RejectionRecord {
            by: actor.id,
            at,
            reason: reason.into(),
        }),
    })
}

/// Checks that the actor may edit the permit's descriptive fields.
///
/// Returns the statuses the update must be conditioned on.
pub fn authorize_update(permit: &Permit, actor: &Actor) -> AppResult<&'static [PermitStatus]> {
    if !actor.owns(permit) && !actor.is_admin() {
        return Err(AppError::Forbidden(
            "you can only edit your own permits".to_owned(),
        ));
    }

    if !DRAFT_STAGE.contains(&permit.status) {
        return Err(AppError::Conflict(format!(
            "permit is {}; only draft permits can be edited",
            permit.status
        )));
    }

    Ok(DRAFT_STAGE)
}

/// Checks that the actor may delete the permit.
///
/// Active permits cannot be deleted by anyone.
pub fn authorize_delete(permit: &Permit, actor: &Actor) -> AppResult<()> {
    if permit.status == PermitStatus::Active {
        return Err(AppError::Conflict(
            "cannot delete active permit; complete or cancel it first".to_owned(),
        ));
    }

    if !actor.owns(permit) && !actor.is_admin() {
        return Err(AppError::Forbidden(
            "you can only delete your own permits".to_owned(),
        ));
    }

    if !actor.role.can_own_permits() {
        return Err(AppError::Forbidden(
            "only PTWC or ADMIN can delete permits".to_owned(),
        ));
    }

    Ok(())
}

fn ensure_awaiting(permit: &Permit, stage: ApprovalStage) -> AppResult<()> {
    if !stage.awaiting().contains(&permit.status) {
        return Err(AppError::Conflict(stage.not_awaiting_message(permit.status)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::documents::RelatedDocuments;
    use crate::permit::{PermitDetails, PermitDraft, PermitId, WorkType, Zone};

    const OWNER: Actor = Actor {
        id: UserId::new(1),
        role: Role::PermitController,
    };
    const OTHER_PTWC: Actor = Actor {
        id: UserId::new(2),
        role: Role::PermitController,
    };
    const AREA: Actor = Actor {
        id: UserId::new(3),
        role: Role::AreaAuthority,
    };
    const SITE: Actor = Actor {
        id: UserId::new(4),
        role: Role::SiteController,
    };
    const ADMIN: Actor = Actor {
        id: UserId::new(5),
        role: Role::Admin,
    };

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .map(|value| value.and_utc())
            .unwrap_or_else(|| unreachable!())
    }

    fn permit(status: PermitStatus) -> Permit {
        let details = PermitDetails::from_stored(PermitDraft {
            work_description: "Weld support bracket".to_owned(),
            work_location: None,
            zone: Zone::Prc,
            work_type: Some(WorkType::HotWorkFlame),
            risk_level: None,
            start_date: now(),
            end_date: now() + chrono::Duration::days(1),
            coordinates: None,
            performing_authority: None,
            company: None,
            area_authority: None,
            site_controller_name: None,
            safety_measures: None,
            related_documents: RelatedDocuments::default(),
        });

        Permit {
            id: PermitId::new(10),
            permit_number: "PERMIT-20250110-0001".to_owned(),
            details,
            status,
            owner_id: OWNER.id,
            aa_approval: None,
            sc_approval: None,
            rejection: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn advance(permit: &mut Permit, transition: AppResult<Transition>) {
        assert!(transition.is_ok(), "{transition:?}");
        let transition = transition.unwrap_or_else(|_| unreachable!());
        assert!(transition.applies_to(permit.status));
        permit.apply(&transition, now());
    }

    #[test]
    fn full_chain_ends_active_with_both_approvers() {
        let mut permit = permit(PermitStatus::Draft);

        let submit = plan_submit(&permit, &OWNER);
        advance(&mut permit, submit);
        assert_eq!(permit.status, PermitStatus::PendingAaApproval);

        let area = plan_approval(&permit, &AREA, Role::AreaAuthority, Some("  ok  "), now());
        advance(&mut permit, area);
        assert_eq!(permit.status, PermitStatus::AaApproved);
        assert_eq!(
            permit.aa_approval.as_ref().and_then(|record| record.comment.as_deref()),
            Some("ok")
        );

        let site = plan_approval(&permit, &SITE, Role::SiteController, None, now());
        assert_eq!(
            site.as_ref().map(Transition::passes_through).ok(),
            Some(SITE_APPROVAL_AUDIT)
        );
        advance(&mut permit, site);

        assert_eq!(permit.status, PermitStatus::Active);
        assert_eq!(permit.aa_approval.as_ref().map(|record| record.by), Some(AREA.id));
        assert_eq!(permit.sc_approval.as_ref().map(|record| record.by), Some(SITE.id));
        assert!(permit.rejection.is_none());
    }

    #[test]
    fn site_controller_cannot_approve_before_area_authority() {
        let permit = permit(PermitStatus::PendingAaApproval);
        let result = plan_approval(&permit, &SITE, Role::SiteController, None, now());

        assert!(
            matches!(result, Err(AppError::Conflict(message)) if message.contains("must be approved by AA first"))
        );
    }

    #[test]
    fn site_controller_acts_on_pending_sc_status() {
        let permit = permit(PermitStatus::PendingScApproval);

        assert!(plan_approval(&permit, &SITE, Role::SiteController, None, now()).is_ok());
        assert_eq!(
            plan_rejection(&permit, &SITE, Role::SiteController, "no isolation", now())
                .map(|transition| transition.to())
                .ok(),
            Some(PermitStatus::RejectedBySc)
        );
    }

    #[test]
    fn claimed_role_must_match_persisted_role() {
        let permit = permit(PermitStatus::PendingAaApproval);

        let result = plan_approval(&permit, &OTHER_PTWC, Role::AreaAuthority, None, now());
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let result = plan_approval(&permit, &SITE, Role::AreaAuthority, None, now());
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn non_approver_roles_cannot_approve() {
        let permit = permit(PermitStatus::PendingAaApproval);

        let result = plan_approval(&permit, &ADMIN, Role::Admin, None, now());
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        let result = plan_rejection(&permit, &OWNER, Role::PermitController, "no", now());
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn rejection_requires_reason() {
        let permit = permit(PermitStatus::PendingAaApproval);

        for reason in ["", "   ", "\n\t"] {
            let result = plan_rejection(&permit, &AREA, Role::AreaAuthority, reason, now());
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn rejection_keeps_earlier_approval() {
        let mut permit = permit(PermitStatus::PendingAaApproval);
        let area = plan_approval(&permit, &AREA, Role::AreaAuthority, None, now());
        advance(&mut permit, area);
        let rejection = plan_rejection(&permit, &SITE, Role::SiteController, " missing JSA ", now());
        advance(&mut permit, rejection);

        assert_eq!(permit.status, PermitStatus::RejectedBySc);
        assert!(permit.aa_approval.is_some());
        assert_eq!(
            permit.rejection.as_ref().map(|record| record.reason.as_str()),
            Some("missing JSA")
        );
    }

    #[test]
    fn submit_requires_owner_or_admin() {
        let draft = permit(PermitStatus::Draft);

        assert!(matches!(
            plan_submit(&draft, &OTHER_PTWC),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(plan_submit(&draft, &AREA), Err(AppError::Forbidden(_))));
        assert!(plan_submit(&draft, &ADMIN).is_ok());

        let submitted = permit(PermitStatus::PendingAaApproval);
        assert!(matches!(
            plan_submit(&submitted, &OWNER),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn delete_rules() {
        let draft = permit(PermitStatus::Draft);
        assert!(authorize_delete(&draft, &OWNER).is_ok());
        assert!(authorize_delete(&draft, &ADMIN).is_ok());
        assert!(matches!(
            authorize_delete(&draft, &OTHER_PTWC),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize_delete(&draft, &AREA),
            Err(AppError::Forbidden(_))
        ));

        let active = permit(PermitStatus::Active);
        for actor in [OWNER, OTHER_PTWC, AREA, SITE, ADMIN] {
            assert!(matches!(
                authorize_delete(&active, &actor),
                Err(AppError::Conflict(_))
            ));
        }
    }

    #[test]
    fn update_only_while_draft() {
        assert!(authorize_update(&permit(PermitStatus::Draft), &OWNER).is_ok());
        assert!(matches!(
            authorize_update(&permit(PermitStatus::Draft), &OTHER_PTWC),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize_update(&permit(PermitStatus::AaApproved), &ADMIN),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn active_permit_completes_and_can_then_be_deleted() {
        let mut permit = permit(PermitStatus::Active);
        assert!(matches!(
            authorize_delete(&permit, &OWNER),
            Err(AppError::Conflict(message)) if message.contains("complete or cancel")
        ));

        let complete = plan_complete(&permit, &OWNER);
        advance(&mut permit, complete);

        assert_eq!(permit.status, PermitStatus::Completed);
        assert!(authorize_delete(&permit, &OWNER).is_ok());
    }

    #[test]
    fn only_owner_or_admin_closes_permits() {
        let active = permit(PermitStatus::Active);
        assert!(plan_complete(&active, &ADMIN).is_ok());
        for actor in [OTHER_PTWC, AREA, SITE] {
            assert!(matches!(
                plan_complete(&active, &actor),
                Err(AppError::Forbidden(_))
            ));
        }

        let pending = permit(PermitStatus::AaApproved);
        assert!(plan_cancel(&pending, &ADMIN).is_ok());
        assert!(matches!(
            plan_cancel(&pending, &SITE),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn cancel_keeps_approval_records() {
        let mut permit = permit(PermitStatus::PendingAaApproval);
        let area = plan_approval(&permit, &AREA, Role::AreaAuthority, None, now());
        advance(&mut permit, area);
        let cancel = plan_cancel(&permit, &OWNER);
        advance(&mut permit, cancel);

        assert_eq!(permit.status, PermitStatus::Cancelled);
        assert!(permit.aa_approval.is_some());
    }

    #[test]
    fn only_owner_roles_create() {
        assert!(authorize_create(&OWNER).is_ok());
        assert!(authorize_create(&ADMIN).is_ok());
        assert!(matches!(authorize_create(&SITE), Err(AppError::Forbidden(_))));
    }

    fn legal(stage_actor: &Actor, status: PermitStatus) -> bool {
        match stage_actor.role {
            Role::AreaAuthority => status == PermitStatus::PendingAaApproval,
            Role::SiteController => {
                matches!(status, PermitStatus::AaApproved | PermitStatus::PendingScApproval)
            }
            Role::PermitController | Role::Admin => false,
        }
    }

    proptest! {
        #[test]
        fn illegal_stage_actions_are_conflicts(
            status in proptest::sample::select(PermitStatus::all().to_vec()),
            use_site in any::<bool>(),
            approve in any::<bool>(),
        ) {
            let actor = if use_site { SITE } else { AREA };
            let permit = permit(status);

            let result = if approve {
                plan_approval(&permit, &actor, actor.role, None, now())
            } else {
                plan_rejection(&permit, &actor, actor.role, "unsafe", now())
            };

            if legal(&actor, status) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(AppError::Conflict(_))));
            }
        }

        #[test]
        fn complete_only_from_active(
            status in proptest::sample::select(PermitStatus::all().to_vec()),
        ) {
            let result = plan_complete(&permit(status), &OWNER);

            if status == PermitStatus::Active {
                prop_assert_eq!(
                    result.map(|transition| transition.to()).ok(),
                    Some(PermitStatus::Completed)
                );
            } else {
                prop_assert!(matches!(result, Err(AppError::Conflict(_))));
            }
        }

        #[test]
        fn cancel_only_before_a_terminal_status(
            status in proptest::sample::select(PermitStatus::all().to_vec()),
        ) {
            let result = plan_cancel(&permit(status), &OWNER);

            match status {
                PermitStatus::Active
                | PermitStatus::RejectedByAa
                | PermitStatus::RejectedBySc
                | PermitStatus::Completed
                | PermitStatus::Cancelled => {
                    prop_assert!(matches!(result, Err(AppError::Conflict(_))));
                }
                _ => {
                    let transition = result.unwrap_or_else(|_| unreachable!());
                    prop_assert!(transition.applies_to(status));
                    prop_assert_eq!(transition.to(), PermitStatus::Cancelled);
                }
            }
        }

        #[test]
        fn submit_from_non_draft_is_conflict(
            status in proptest::sample::select(PermitStatus::all().to_vec()),
        ) {
            let result = plan_submit(&permit(status), &OWNER);

            if status == PermitStatus::Draft {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(AppError::Conflict(_))));
            }
        }
    }
}
