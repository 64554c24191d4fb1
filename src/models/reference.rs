use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct League {
    pub id: Uuid,
    pub api_id: i64,
    pub name: String,
    pub season: Option<i32>,
    pub season_start: Option<NaiveDate>,
    pub season_end: Option<NaiveDate>,
    pub is_current: bool,
    pub logo: Option<String>,
    pub country_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Team {
    pub id: Uuid,
    pub api_id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub country_id: Option<Uuid>,
}

// Internal shapes produced from provider payloads, merged by the importer

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryRow {
    pub name: String,
    pub code: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeagueRow {
    pub api_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub season: Option<i32>,
    pub season_start: Option<NaiveDate>,
    pub season_end: Option<NaiveDate>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamRow {
    pub api_id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub country: Option<String>,
}

/// Counters of one reference import run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    /// Rows dropped for data-quality reasons (unknown country, filtered out)
    pub skipped: usize,
}
