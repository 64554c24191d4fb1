use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::fixture::SyncReport;
use crate::models::reference::ImportReport;

/// Process-wide refresh cadence state, read at the start of a scheduled run
/// and written back at its end
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateSchedule {
    pub next_league_update: NaiveDate,
    pub next_fixture_update: NaiveDate,
    pub last_fixture_update: Option<DateTime<Utc>>,
}

/// Which refreshes are due for a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePlan {
    pub refresh_leagues: bool,
    pub refresh_fixtures: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CadenceOutcome<T> {
    NotDue,
    Completed(T),
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeagueRefreshReport {
    pub countries: ImportReport,
    pub leagues: ImportReport,
    pub teams: Option<ImportReport>,
    pub fixtures: Option<SyncReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledUpdateReport {
    pub league_refresh: CadenceOutcome<LeagueRefreshReport>,
    pub fixture_refresh: CadenceOutcome<SyncReport>,
    pub schedule: UpdateSchedule,
}
