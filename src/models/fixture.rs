use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Fixture {
    pub id: Uuid,
    pub api_id: i64,
    pub league_id: Uuid,
    pub match_start: DateTime<Utc>,
    pub status: Option<String>,
    pub status_short: Option<String>,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_odds: Option<f64>,
    pub draw_odds: Option<f64>,
    pub away_odds: Option<f64>,
}

/// A fixture as reported by the provider, keyed by external ids
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureRow {
    pub api_id: i64,
    pub league_api_id: i64,
    pub match_start: DateTime<Utc>,
    pub status: Option<String>,
    pub status_short: Option<String>,
    pub home_team_api_id: i64,
    pub away_team_api_id: i64,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

/// Average "Match Winner" odds over all bookmakers quoting a fixture.
/// An outcome nobody quoted stays `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

impl AverageOdds {
    pub fn is_empty(&self) -> bool {
        self.home.is_none() && self.draw.is_none() && self.away.is_none()
    }
}

/// Fully resolved insert-or-update for one fixture
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureUpsert {
    pub api_id: i64,
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_start: DateTime<Utc>,
    pub status: Option<String>,
    pub status_short: Option<String>,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub odds: Option<AverageOdds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Every fixture of every relevant league, used after new leagues appear
    ByLeagues,
    /// Yesterday through today + 2, the daily refresh; the only mode touching odds
    ByDateRange,
    /// Today's fixtures only, for on-demand refreshes
    Live,
}

impl SyncMode {
    pub fn refreshes_odds(&self) -> bool {
        matches!(self, SyncMode::ByDateRange)
    }

    /// Match days requested from the provider in date-based modes
    pub fn match_days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        match self {
            SyncMode::ByLeagues => Vec::new(),
            SyncMode::ByDateRange => (-1..=2).map(|offset| today + Duration::days(offset)).collect(),
            SyncMode::Live => vec![today],
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::ByLeagues => write!(f, "by_leagues"),
            SyncMode::ByDateRange => write!(f, "by_date_range"),
            SyncMode::Live => write!(f, "live"),
        }
    }
}

/// Counters of one fixture synchronisation
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub duplicates: usize,
    pub unparsable: usize,
    pub unknown_league: usize,
    pub unknown_team: usize,
    pub odds_requested: usize,
    pub created: usize,
    pub updated: usize,
    pub tipps_evaluated: usize,
}

impl SyncReport {
    pub fn written(&self) -> usize {
        self.created + self.updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_mode_covers_yesterday_through_two_days_ahead() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days = SyncMode::ByDateRange.match_days(today);
        assert_eq!(days, vec![
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        ]);
        assert_eq!(SyncMode::Live.match_days(today), vec![today]);
        assert!(SyncMode::ByLeagues.match_days(today).is_empty());
    }

    #[test]
    fn test_only_date_range_refreshes_odds() {
        assert!(SyncMode::ByDateRange.refreshes_odds());
        assert!(!SyncMode::Live.refreshes_odds());
        assert!(!SyncMode::ByLeagues.refreshes_odds());
    }
}
