//! Role-scoped dashboard views over the permit set.

use serde::Serialize;

use crate::approval::{Actor, ApprovalStage};
use crate::permit::{Permit, PermitStatus};
use crate::user::{Role, UserId};

/// Which permits a role's dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardScope {
    /// Permits created by one user, any status.
    OwnedBy(UserId),
    /// Permits in any of these statuses, system-wide.
    AwaitingStage(&'static [PermitStatus]),
    /// Every permit.
    All,
}

impl DashboardScope {
    /// Returns the scope for an actor's persisted role.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::PermitController => Self::OwnedBy(actor.id),
            Role::AreaAuthority => Self::AwaitingStage(ApprovalStage::Area.awaiting()),
            Role::SiteController => Self::AwaitingStage(ApprovalStage::Site.awaiting()),
            Role::Admin => Self::All,
        }
    }

    /// Returns whether a permit belongs on the dashboard.
    #[must_use]
    pub fn includes(&self, permit: &Permit) -> bool {
        match self {
            Self::OwnedBy(owner_id) => permit.owner_id == *owner_id,
            Self::AwaitingStage(statuses) => statuses.contains(&permit.status),
            Self::All => true,
        }
    }
}

/// Per-status counts shown to permit owners and administrators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    /// `DRAFT`.
    pub draft: usize,
    /// `PENDING_AA_APPROVAL`.
    pub pending_aa: usize,
    /// `AA_APPROVED` and `PENDING_SC_APPROVAL`.
    pub pending_sc: usize,
    /// `FULLY_APPROVED`.
    pub fully_approved: usize,
    /// `ACTIVE`.
    pub active: usize,
    /// Rejected at either stage.
    pub rejected: usize,
}

impl StatusBreakdown {
    fn count(permits: &[Permit]) -> Self {
        permits
            .iter()
            .fold(Self::default(), |mut breakdown, permit| {
                match permit.status {
                    status if status.is_rejected() => breakdown.rejected += 1,
                    PermitStatus::Draft => breakdown.draft += 1,
                    PermitStatus::PendingAaApproval => breakdown.pending_aa += 1,
                    PermitStatus::AaApproved | PermitStatus::PendingScApproval => {
                        breakdown.pending_sc += 1;
                    }
                    PermitStatus::FullyApproved => breakdown.fully_approved += 1,
                    PermitStatus::Active => breakdown.active += 1,
                    _ => {}
                }
                breakdown
            })
    }
}

/// Summary counts returned with the dashboard list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DashboardStats {
    /// Owner and administrator view.
    Portfolio {
        /// Number of listed permits.
        total: usize,
        /// Counts by status.
        breakdown: StatusBreakdown,
    },
    /// Approver view.
    ApprovalQueue {
        /// Number of listed permits.
        total: usize,
        /// Permits waiting for this approver's stage.
        pending_approval: usize,
    },
}

impl DashboardStats {
    /// Returns the number of listed permits.
    #[must_use]
    pub fn total(&self) -> usize {
        match self {
            Self::Portfolio { total, .. } | Self::ApprovalQueue { total, .. } => *total,
        }
    }
}

/// A role's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Role the dashboard was built for.
    pub role: Role,
    /// Heading shown above the list.
    pub title: &'static str,
    /// Permits in scope, newest first.
    pub permits: Vec<Permit>,
    /// Summary counts.
    pub stats: DashboardStats,
}

impl Dashboard {
    /// Builds the dashboard for `actor` from candidate permits.
    ///
    /// Permits outside the actor's scope are dropped, so callers may pass a
    /// pre-filtered list or the whole set.
    #[must_use]
    pub fn build(actor: &Actor, permits: Vec<Permit>) -> Self {
        let scope = DashboardScope::for_actor(actor);
        let mut permits: Vec<Permit> = permits
            .into_iter()
            .filter(|permit| scope.includes(permit))
            .collect();
        permits.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });

        let total = permits.len();
        let stats = match scope {
            DashboardScope::AwaitingStage(_) => DashboardStats::ApprovalQueue {
                total,
                pending_approval: total,
            },
            DashboardScope::OwnedBy(_) | DashboardScope::All => DashboardStats::Portfolio {
                total,
                breakdown: StatusBreakdown::count(&permits),
            },
        };

        Self {
            role: actor.role,
            title: dashboard_title(actor.role),
            permits,
            stats,
        }
    }
}

/// Returns the dashboard heading for a role.
#[must_use]
pub fn dashboard_title(role: Role) -> &'static str {
    match role {
        Role::PermitController => "PTWC Dashboard - My Permits",
        Role::AreaAuthority => "AA Dashboard - Permits Awaiting My Approval",
        Role::SiteController => "SC Dashboard - Permits Awaiting My Approval",
        Role::Admin => "Admin Dashboard - All Permits",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, Utc};

    use super::*;
    use crate::documents::RelatedDocuments;
    use crate::permit::{PermitDetails, PermitDraft, PermitId, Zone};

    fn base_time() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 2, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|value| value.and_utc())
            .unwrap_or_else(|| unreachable!())
    }

    fn permit(id: i64, owner: i64, status: PermitStatus) -> Permit {
        let created_at = base_time() + Duration::minutes(id);
        Permit {
            id: PermitId::new(id),
            permit_number: format!("PERMIT-20250201-{id:04}"),
            details: PermitDetails::from_stored(PermitDraft {
                work_description: format!("Job {id}"),
                work_location: None,
                zone: Zone::Utl,
                work_type: None,
                risk_level: None,
                start_date: created_at,
                end_date: created_at + Duration::hours(8),
                coordinates: None,
                performing_authority: None,
                company: None,
                area_authority: None,
                site_controller_name: None,
                safety_measures: None,
                related_documents: RelatedDocuments::default(),
            }),
            status,
            owner_id: UserId::new(owner),
            aa_approval: None,
            sc_approval: None,
            rejection: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn sample() -> Vec<Permit> {
        vec![
            permit(1, 1, PermitStatus::Draft),
            permit(2, 1, PermitStatus::PendingAaApproval),
            permit(3, 1, PermitStatus::AaApproved),
            permit(4, 1, PermitStatus::Active),
            permit(5, 1, PermitStatus::RejectedByAa),
            permit(6, 2, PermitStatus::PendingAaApproval),
            permit(7, 2, PermitStatus::PendingScApproval),
            permit(8, 2, PermitStatus::RejectedBySc),
        ]
    }

    fn ids(dashboard: &Dashboard) -> Vec<i64> {
        dashboard
            .permits
            .iter()
            .map(|permit| permit.id.as_i64())
            .collect()
    }

    #[test]
    fn owner_sees_own_permits_with_breakdown() {
        let actor = Actor::new(UserId::new(1), Role::PermitController);
        let dashboard = Dashboard::build(&actor, sample());

        assert_eq!(ids(&dashboard), vec![5, 4, 3, 2, 1]);
        assert_eq!(dashboard.title, "PTWC Dashboard - My Permits");
        assert_eq!(
            dashboard.stats,
            DashboardStats::Portfolio {
                total: 5,
                breakdown: StatusBreakdown {
                    draft: 1,
                    pending_aa: 1,
                    pending_sc: 1,
                    fully_approved: 0,
                    active: 1,
                    rejected: 1,
                },
            }
        );
    }

    #[test]
    fn area_authority_sees_pending_aa_system_wide() {
        let actor = Actor::new(UserId::new(9), Role::AreaAuthority);
        let dashboard = Dashboard::build(&actor, sample());

        assert_eq!(ids(&dashboard), vec![6, 2]);
        assert_eq!(
            dashboard.stats,
            DashboardStats::ApprovalQueue {
                total: 2,
                pending_approval: 2
            }
        );
    }

    #[test]
    fn site_controller_sees_both_awaiting_statuses() {
        let actor = Actor::new(UserId::new(9), Role::SiteController);
        let dashboard = Dashboard::build(&actor, sample());

        assert_eq!(ids(&dashboard), vec![7, 3]);
        assert_eq!(dashboard.stats.total(), 2);
    }

    #[test]
    fn admin_sees_everything() {
        let actor = Actor::new(UserId::new(9), Role::Admin);
        let dashboard = Dashboard::build(&actor, sample());

        assert_eq!(dashboard.permits.len(), 8);
        assert_eq!(dashboard.title, "Admin Dashboard - All Permits");
        assert!(matches!(
            dashboard.stats,
            DashboardStats::Portfolio { total: 8, breakdown } if breakdown.rejected == 2 && breakdown.pending_sc == 2
        ));
    }
}
