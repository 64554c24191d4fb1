use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Tipp {
    pub id: Uuid,
    pub fixture_id: Uuid,
    pub player_id: Uuid,
    pub game_id: Uuid,
    pub tipp_home: i32,
    pub tipp_away: i32,
    pub score: Option<i32>,
    pub is_final: bool,
}

/// One fixture as shown to a player within one of their games,
/// with the player's own prediction when there is one
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct TippView {
    pub fixture_id: Uuid,
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub match_start: DateTime<Utc>,
    pub status: Option<String>,
    pub status_short: Option<String>,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_odds: Option<f64>,
    pub draw_odds: Option<f64>,
    pub away_odds: Option<f64>,
    pub home_team_name: String,
    pub home_team_logo: Option<String>,
    pub away_team_name: String,
    pub away_team_logo: Option<String>,
    pub league_name: String,
    pub league_logo: Option<String>,
    pub game_name: String,
    pub tipp_id: Option<Uuid>,
    pub tipp_home: Option<i32>,
    pub tipp_away: Option<i32>,
    pub score: Option<i32>,
    pub is_final: Option<bool>,
}

/// Everyone's prediction for one fixture of a game
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct FixtureTippEntry {
    pub tipp_id: Uuid,
    pub player_id: Uuid,
    pub username: String,
    pub tipp_home: i32,
    pub tipp_away: i32,
    pub score: Option<i32>,
    pub is_final: bool,
}

// Request DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmitTippRequest {
    pub game_id: Uuid,
    pub fixture_id: Uuid,
    pub tipp_home: i32,
    pub tipp_away: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateTippRequest {
    pub tipp_home: i32,
    pub tipp_away: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TippListQuery {
    pub game_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
