use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::sync::SyncSettings;
use crate::db::{GameQueries, ScheduleQueries, TippQuery};
use crate::models::errors::GameError;
use crate::models::game::{
    CreateGameRequest, Game, GameDetailResponse, GameListEntry, GamesOverview, MembershipStatus, Player,
};
use crate::models::tipp::TippView;

pub const UPCOMING_DAYS: i64 = 8;

/// Start of the given day, UTC
pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Fixtures that kicked off today up to now, and those starting from now
/// until `horizon_days` after today's midnight
pub fn tipp_windows(
    now: DateTime<Utc>,
    horizon_days: i64,
) -> ((DateTime<Utc>, DateTime<Utc>), (DateTime<Utc>, DateTime<Utc>)) {
    let midnight = day_start(now.date_naive());
    ((midnight, now), (now, midnight + Duration::days(horizon_days)))
}

/// Split a player's games into the ones they play in and open invitations.
/// Declined games are dropped.
pub fn split_overview(entries: Vec<GameListEntry>) -> GamesOverview {
    let (games, rest): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.status.is_visible());
    let invitations = rest
        .into_iter()
        .filter(|e| e.status == MembershipStatus::Invited)
        .collect();
    GamesOverview { games, invitations }
}

#[derive(Debug, Clone)]
pub struct GameService {
    pool: PgPool,
    games: GameQueries,
    schedule: ScheduleQueries,
    settings: SyncSettings,
}

impl GameService {
    pub fn new(pool: PgPool, settings: SyncSettings) -> Self {
        Self {
            games: GameQueries::new(pool.clone()),
            schedule: ScheduleQueries::new(pool.clone()),
            pool,
            settings,
        }
    }

    pub async fn ensure_player(
        &self,
        user_id: Uuid,
        username: &str,
        pic: Option<&str>,
    ) -> Result<Player, GameError> {
        let player = self.games.ensure_player(user_id, username, pic).await?;
        Ok(player)
    }

    pub async fn player_for_user(&self, user_id: Uuid) -> Result<Player, GameError> {
        self.games
            .find_player_by_user(user_id)
            .await?
            .ok_or(GameError::PlayerNotFound)
    }

    pub async fn create_game(&self, creator: &Player, request: &CreateGameRequest) -> Result<Game, GameError> {
        if request.name.trim().is_empty() {
            return Err(GameError::InvalidName);
        }
        if !request.point_schedule().is_valid() {
            return Err(GameError::InvalidPoints);
        }

        let game = self.games.create_game(creator.id, request).await?;
        Ok(game)
    }

    pub async fn list_games(&self, player: &Player) -> Result<GamesOverview, GameError> {
        let entries = self.games.games_for_player(player.id).await?;
        Ok(split_overview(entries))
    }

    pub async fn accept_invitation(&self, player: &Player, game_id: Uuid) -> Result<(), GameError> {
        self.answer_invitation(player, game_id, MembershipStatus::Active).await
    }

    pub async fn decline_invitation(&self, player: &Player, game_id: Uuid) -> Result<(), GameError> {
        self.answer_invitation(player, game_id, MembershipStatus::Declined).await
    }

    async fn answer_invitation(&self, player: &Player, game_id: Uuid, to: MembershipStatus) -> Result<(), GameError> {
        if self.games.membership(game_id, player.id).await?.is_none() {
            return Err(GameError::NotFound);
        }
        if !self.games.transition_invitation(game_id, player.id, to).await? {
            return Err(GameError::InvalidTransition);
        }
        tracing::info!("Player {} is now {} in game {}", player.id, to, game_id);
        Ok(())
    }

    /// Games a player is not a visible member of are reported as not found
    pub async fn game_detail(
        &self,
        player: &Player,
        game_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<GameDetailResponse, GameError> {
        let visible = self
            .games
            .membership(game_id, player.id)
            .await?
            .is_some_and(|m| m.status.is_visible());
        if !visible {
            return Err(GameError::NotFound);
        }
        let game = self.games.get_game(game_id).await?.ok_or(GameError::NotFound)?;

        let leagues = self
            .games
            .league_progress(game_id, &self.settings.final_status_codes)
            .await?;
        let rankings = self.games.rankings(game_id).await?;

        let (started, to_start) = tipp_windows(now, UPCOMING_DAYS);
        let base = TippQuery::for_player(player.id).in_game(game_id);
        let fixtures_started = base
            .clone()
            .starting_between(Some(started.0), Some(started.1))
            .fetch(&self.pool)
            .await?;
        let fixtures_to_start = base
            .starting_between(Some(to_start.0), Some(to_start.1))
            .fetch(&self.pool)
            .await?;

        let last_fixture_update = self.schedule.load().await?.last_fixture_update;

        Ok(GameDetailResponse {
            game,
            leagues,
            rankings,
            fixtures_started,
            fixtures_to_start,
            last_fixture_update,
        })
    }

    /// Today's started fixtures and those up to tomorrow midnight, across all games
    pub async fn today(&self, player: &Player, now: DateTime<Utc>) -> Result<(Vec<TippView>, Vec<TippView>), GameError> {
        let (started, to_start) = tipp_windows(now, 1);
        let started = TippQuery::for_player(player.id)
            .starting_between(Some(started.0), Some(started.1))
            .fetch(&self.pool)
            .await?;
        let to_start = TippQuery::for_player(player.id)
            .starting_between(Some(to_start.0), Some(to_start.1))
            .fetch(&self.pool)
            .await?;
        Ok((started, to_start))
    }
}
