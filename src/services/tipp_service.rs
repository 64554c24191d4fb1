use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{FixtureQueries, GameQueries, TippQueries, TippQuery};
use crate::models::errors::TippError;
use crate::models::game::Player;
use crate::models::tipp::{FixtureTippEntry, SubmitTippRequest, Tipp, TippListQuery, TippView};

/// Predictions are only accepted strictly before kickoff
pub fn ensure_open(match_start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), TippError> {
    if match_start > now {
        Ok(())
    } else {
        Err(TippError::MatchStarted)
    }
}

pub fn validate_goals(home: i32, away: i32) -> Result<(), TippError> {
    if home < 0 || away < 0 {
        return Err(TippError::InvalidGoals);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct TippService {
    pool: PgPool,
    tipps: TippQueries,
    fixtures: FixtureQueries,
    games: GameQueries,
}

impl TippService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tipps: TippQueries::new(pool.clone()),
            fixtures: FixtureQueries::new(pool.clone()),
            games: GameQueries::new(pool.clone()),
            pool,
        }
    }

    /// Fixtures of the player's games with their own tipps, by kickoff
    pub async fn query_tipps(&self, player: &Player, filter: &TippListQuery) -> Result<Vec<TippView>, TippError> {
        let mut query = TippQuery::for_player(player.id).starting_between(filter.from, filter.to);
        if let Some(game_id) = filter.game_id {
            query = query.in_game(game_id);
        }
        let rows = query.fetch(&self.pool).await?;
        Ok(rows)
    }

    /// Create the player's tipp for a fixture in a game, or overwrite the
    /// one they already submitted
    pub async fn submit_tipp(
        &self,
        player: &Player,
        request: &SubmitTippRequest,
        now: DateTime<Utc>,
    ) -> Result<Tipp, TippError> {
        validate_goals(request.tipp_home, request.tipp_away)?;
        self.ensure_member(request.game_id, player.id).await?;

        let fixture = self
            .fixtures
            .get_fixture(request.fixture_id)
            .await?
            .ok_or(TippError::FixtureNotFound)?;
        if !self.games.fixture_in_game(request.game_id, fixture.id).await? {
            return Err(TippError::FixtureNotInGame);
        }
        ensure_open(fixture.match_start, now)?;

        let tipp = self
            .tipps
            .upsert_tipp(
                player.id,
                request.game_id,
                fixture.id,
                request.tipp_home,
                request.tipp_away,
            )
            .await?
            .ok_or(TippError::AlreadyFinal)?;

        tracing::info!(
            "Player {} tipped {}:{} on fixture {} in game {}",
            player.id, tipp.tipp_home, tipp.tipp_away, fixture.id, request.game_id
        );
        Ok(tipp)
    }

    pub async fn update_tipp(
        &self,
        player: &Player,
        tipp_id: Uuid,
        tipp_home: i32,
        tipp_away: i32,
        now: DateTime<Utc>,
    ) -> Result<Tipp, TippError> {
        validate_goals(tipp_home, tipp_away)?;
        let existing = self.owned_tipp(player, tipp_id).await?;
        if existing.is_final {
            return Err(TippError::AlreadyFinal);
        }
        self.ensure_member(existing.game_id, player.id).await?;

        let fixture = self
            .fixtures
            .get_fixture(existing.fixture_id)
            .await?
            .ok_or(TippError::FixtureNotFound)?;
        ensure_open(fixture.match_start, now)?;

        self.tipps
            .update_goals(tipp_id, player.id, tipp_home, tipp_away)
            .await?
            .ok_or(TippError::AlreadyFinal)
    }

    pub async fn delete_tipp(&self, player: &Player, tipp_id: Uuid) -> Result<(), TippError> {
        let existing = self.owned_tipp(player, tipp_id).await?;
        if existing.is_final {
            return Err(TippError::AlreadyFinal);
        }
        if !self.tipps.delete_tipp(tipp_id, player.id).await? {
            return Err(TippError::AlreadyFinal);
        }
        tracing::info!("Player {} deleted tipp {}", player.id, tipp_id);
        Ok(())
    }

    /// Everyone's tipps on one fixture of a game; members only
    pub async fn fixture_tipps(
        &self,
        player: &Player,
        game_id: Uuid,
        fixture_id: Uuid,
    ) -> Result<Vec<FixtureTippEntry>, TippError> {
        self.ensure_member(game_id, player.id).await?;
        let entries = self.tipps.fixture_tipps(game_id, fixture_id).await?;
        Ok(entries)
    }

    /// A tipp of another player is indistinguishable from a missing one
    async fn owned_tipp(&self, player: &Player, tipp_id: Uuid) -> Result<Tipp, TippError> {
        self.tipps
            .find_player_tipp(tipp_id, player.id)
            .await?
            .ok_or(TippError::NotFound)
    }

    async fn ensure_member(&self, game_id: Uuid, player_id: Uuid) -> Result<(), TippError> {
        match self.games.membership(game_id, player_id).await? {
            Some(membership) if membership.status.is_visible() => Ok(()),
            _ => Err(TippError::NotMember),
        }
    }
}
