use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::models::tipp::TippView;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Player {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub pts_exact: i32,
    pub pts_difference: i32,
    pub pts_winner: i32,
    pub pts_wrong: i32,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn point_schedule(&self) -> PointSchedule {
        PointSchedule {
            exact: self.pts_exact,
            difference: self.pts_difference,
            winner: self.pts_winner,
            wrong: self.pts_wrong,
        }
    }
}

/// Points a game awards per prediction category
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PointSchedule {
    pub exact: i32,
    pub difference: i32,
    pub winner: i32,
    pub wrong: i32,
}

impl PointSchedule {
    pub fn is_valid(&self) -> bool {
        self.exact >= 0 && self.difference >= 0 && self.winner >= 0 && self.wrong >= 0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Creator,
    Invited,
    Active,
    Declined,
}

impl MembershipStatus {
    /// Only creators and players who accepted see the game's fixtures
    pub fn is_visible(&self) -> bool {
        matches!(self, MembershipStatus::Creator | MembershipStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Creator => "creator",
            MembershipStatus::Invited => "invited",
            MembershipStatus::Active => "active",
            MembershipStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct GameMembership {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub status: MembershipStatus,
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnsurePlayerRequest {
    pub pic: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateGameRequest {
    pub name: String,
    pub pts_exact: i32,
    pub pts_difference: i32,
    pub pts_winner: i32,
    pub pts_wrong: i32,
    pub league_ids: Vec<Uuid>,
    #[serde(default)]
    pub player_ids: Vec<Uuid>,
}

impl CreateGameRequest {
    pub fn point_schedule(&self) -> PointSchedule {
        PointSchedule {
            exact: self.pts_exact,
            difference: self.pts_difference,
            winner: self.pts_winner,
            wrong: self.pts_wrong,
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct GameListEntry {
    pub id: Uuid,
    pub name: String,
    pub status: MembershipStatus,
    pub creator_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GamesOverview {
    pub games: Vec<GameListEntry>,
    pub invitations: Vec<GameListEntry>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct RankingEntry {
    pub player_id: Uuid,
    pub username: String,
    pub total_score: i64,
    pub scored_tipps: i64,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct LeagueProgress {
    pub league_id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub finished: i64,
    pub to_play: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameDetailResponse {
    pub game: Game,
    pub leagues: Vec<LeagueProgress>,
    pub rankings: Vec<RankingEntry>,
    pub fixtures_started: Vec<TippView>,
    pub fixtures_to_start: Vec<TippView>,
    pub last_fixture_update: Option<DateTime<Utc>>,
}
