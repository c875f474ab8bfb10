use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sika_domain::{Dashboard, DashboardStats, SiteMap, SitePin};
use ts_rs::TS;

use super::PermitResponse;

/// Query string of the dashboard; `role` must equal the caller's stored role.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardParams {
    pub role: String,
}

/// Query string of the site map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteMapParams {
    pub zone: Option<String>,
}

/// Per-status counts shown to owners and administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/status-breakdown-response.ts"
)]
pub struct StatusBreakdownResponse {
    pub draft: usize,
    pub pending_aa: usize,
    pub pending_sc: usize,
    pub fully_approved: usize,
    pub active: usize,
    pub rejected: usize,
}

/// Dashboard summary. Approvers get `pending_approval`, everyone else
/// gets `breakdown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-stats-response.ts"
)]
pub struct DashboardStatsResponse {
    pub total: usize,
    pub pending_approval: Option<usize>,
    pub breakdown: Option<StatusBreakdownResponse>,
}

/// Role-scoped permit list with summary counts.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    pub role: String,
    pub title: String,
    pub permits: Vec<PermitResponse>,
    pub stats: DashboardStatsResponse,
}

/// One live permit placed on the site map.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/site-pin-response.ts"
)]
pub struct SitePinResponse {
    #[ts(type = "number")]
    pub permit_id: i64,
    pub permit_number: String,
    pub zone: String,
    pub work_type: Option<String>,
    pub risk_level: String,
    pub x: f64,
    pub y: f64,
    pub valid_until: String,
    pub phase: String,
}

/// Site map pins and counts.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/site-map-response.ts"
)]
pub struct SiteMapResponse {
    pub pins: Vec<SitePinResponse>,
    pub pin_count: usize,
    pub unplaced: usize,
    pub zones: usize,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        match stats {
            DashboardStats::Portfolio { total, breakdown } => Self {
                total,
                pending_approval: None,
                breakdown: Some(StatusBreakdownResponse {
                    draft: breakdown.draft,
                    pending_aa: breakdown.pending_aa,
                    pending_sc: breakdown.pending_sc,
                    fully_approved: breakdown.fully_approved,
                    active: breakdown.active,
                    rejected: breakdown.rejected,
                }),
            },
            DashboardStats::ApprovalQueue {
                total,
                pending_approval,
            } => Self {
                total,
                pending_approval: Some(pending_approval),
                breakdown: None,
            },
        }
    }
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            role: dashboard.role.as_str().to_owned(),
            title: dashboard.title.to_owned(),
            permits: dashboard
                .permits
                .into_iter()
                .map(PermitResponse::from)
                .collect(),
            stats: dashboard.stats.into(),
        }
    }
}

impl From<SitePin> for SitePinResponse {
    fn from(pin: SitePin) -> Self {
        Self {
            permit_id: pin.permit_id.as_i64(),
            permit_number: pin.permit_number,
            zone: pin.zone.as_str().to_owned(),
            work_type: pin.work_type.map(|work_type| work_type.as_str().to_owned()),
            risk_level: pin.risk_level.as_str().to_owned(),
            x: pin.x,
            y: pin.y,
            valid_until: pin.valid_until.to_rfc3339_opts(SecondsFormat::Secs, true),
            phase: pin.phase.as_str().to_owned(),
        }
    }
}

impl From<SiteMap> for SiteMapResponse {
    fn from(map: SiteMap) -> Self {
        Self {
            pin_count: map.pins.len(),
            pins: map.pins.into_iter().map(SitePinResponse::from).collect(),
            unplaced: map.unplaced,
            zones: map.zones,
        }
    }
}

#[cfg(test)]
mod tests {
    use sika_domain::StatusBreakdown;

    use super::*;

    #[test]
    fn approval_queue_stats_omit_breakdown() {
        let response = DashboardStatsResponse::from(DashboardStats::ApprovalQueue {
            total: 3,
            pending_approval: 3,
        });

        assert_eq!(
            response,
            DashboardStatsResponse {
                total: 3,
                pending_approval: Some(3),
                breakdown: None,
            }
        );
    }

    #[test]
    fn portfolio_stats_carry_breakdown() {
        let response = DashboardStatsResponse::from(DashboardStats::Portfolio {
            total: 4,
            breakdown: StatusBreakdown {
                draft: 1,
                pending_aa: 1,
                pending_sc: 0,
                fully_approved: 0,
                active: 2,
                rejected: 0,
            },
        });

        assert_eq!(response.pending_approval, None);
        assert_eq!(response.breakdown.map(|breakdown| breakdown.active), Some(2));
    }
}
