//! Site map placement of live permits.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::permit::{Permit, PermitId, PermitStatus, RiskLevel, WorkType, Zone};

/// Whole days after the end date during which a finished permit stays on the
/// plan, shown as completed.
const FINISHED_GRACE_DAYS: i64 = 1;

/// Where today falls in a permit's planned window, by UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SitePhase {
    /// Work starts on a later day.
    Pending,
    /// Today is between the start and end days, inclusive.
    Running,
    /// The end day has passed.
    Completed,
}

impl SitePhase {
    /// Classifies `today` against the planned start and end days.
    #[must_use]
    pub fn on(today: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if today < start.date_naive() {
            Self::Pending
        } else if today <= end.date_naive() {
            Self::Running
        } else {
            Self::Completed
        }
    }

    /// Returns the lowercase label used by the plan legend.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

/// One live permit placed on the site plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitePin {
    /// Permit id.
    pub permit_id: PermitId,
    /// Human-readable permit number.
    pub permit_number: String,
    /// Site zone.
    pub zone: Zone,
    /// Hazard class.
    pub work_type: Option<WorkType>,
    /// Risk level.
    pub risk_level: RiskLevel,
    /// Horizontal position, percent of plan width.
    pub x: f64,
    /// Vertical position, percent of plan height.
    pub y: f64,
    /// Planned end of work.
    pub valid_until: DateTime<Utc>,
    /// Progress of the planned window on the day the map was built.
    pub phase: SitePhase,
}

/// Pins for the site plan plus placement counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteMap {
    /// Placed permits.
    pub pins: Vec<SitePin>,
    /// Active permits in scope without usable coordinates.
    pub unplaced: usize,
    /// Distinct zones with at least one pin.
    pub zones: usize,
}

impl SiteMap {
    /// Places the `ACTIVE` permits still current at `now`, optionally
    /// restricted to one zone.
    ///
    /// A permit leaves the plan once a full day has passed after its end day.
    /// Permits without parseable coordinates are counted as unplaced rather
    /// than given a made-up position.
    #[must_use]
    pub fn from_permits(permits: &[Permit], zone: Option<Zone>, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut pins = Vec::new();
        let mut unplaced = 0;

        let live = permits.iter().filter(|permit| {
            permit.status == PermitStatus::Active
                && zone.is_none_or(|zone| permit.details.zone() == zone)
                && days_past_end(today, permit.details.end_date()) <= FINISHED_GRACE_DAYS
        });

        for permit in live {
            match permit.details.coordinates() {
                Some(coordinates) => pins.push(SitePin {
                    permit_id: permit.id,
                    permit_number: permit.permit_number.clone(),
                    zone: permit.details.zone(),
                    work_type: permit.details.work_type(),
                    risk_level: permit.details.risk_level(),
                    x: coordinates.x(),
                    y: coordinates.y(),
                    valid_until: permit.details.end_date(),
                    phase: SitePhase::on(
                        today,
                        permit.details.start_date(),
                        permit.details.end_date(),
                    ),
                }),
                None => unplaced += 1,
            }
        }

        let zones = pins.iter().map(|pin| pin.zone).collect::<BTreeSet<_>>().len();

        Self {
            pins,
            unplaced,
            zones,
        }
    }
}

fn days_past_end(today: NaiveDate, end: DateTime<Utc>) -> i64 {
    (today - end.date_naive()).num_days()
}
