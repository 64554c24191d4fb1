use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::tipp::{FixtureTippEntry, Tipp};

/// A non-final tipp whose fixture has reported goals, with everything needed to score it
#[derive(Debug, FromRow, Clone)]
pub struct ScoringCandidate {
    pub tipp_id: Uuid,
    pub tipp_home: i32,
    pub tipp_away: i32,
    pub home_goals: i32,
    pub away_goals: i32,
    pub status_short: Option<String>,
    pub pts_exact: i32,
    pub pts_difference: i32,
    pub pts_winner: i32,
    pub pts_wrong: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub tipp_id: Uuid,
    pub score: i32,
    pub is_final: bool,
}

#[derive(Debug, Clone)]
pub struct TippQueries {
    pool: PgPool,
}

impl TippQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn scoring_candidates(&self) -> Result<Vec<ScoringCandidate>, sqlx::Error> {
        sqlx::query_as::<_, ScoringCandidate>(
            r#"
            SELECT
                t.id AS tipp_id, t.tipp_home, t.tipp_away,
                f.home_goals, f.away_goals, f.status_short,
                g.pts_exact, g.pts_difference, g.pts_winner, g.pts_wrong
            FROM tipps t
            JOIN fixtures f ON f.id = t.fixture_id
            JOIN games g ON g.id = t.game_id
            WHERE t.is_final = FALSE
              AND f.home_goals IS NOT NULL
              AND f.away_goals IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Write one scoring pass in a single statement. Tipps that became final
    /// in the meantime are left alone, so finality never reverts.
    pub async fn apply_scores(&self, updates: &[ScoreUpdate]) -> Result<u64, sqlx::Error> {
        if updates.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = updates.iter().map(|u| u.tipp_id).collect();
        let scores: Vec<i32> = updates.iter().map(|u| u.score).collect();
        let finals: Vec<bool> = updates.iter().map(|u| u.is_final).collect();

        let result = sqlx::query(
            r#"
            UPDATE tipps AS t
            SET score = u.score,
                is_final = u.is_final,
                updated_at = NOW()
            FROM UNNEST($1::uuid[], $2::int4[], $3::bool[]) AS u(id, score, is_final)
            WHERE t.id = u.id
              AND t.is_final = FALSE
            "#,
        )
        .bind(ids)
        .bind(scores)
        .bind(finals)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a prediction or, when the player already predicted this fixture
    /// in this game, overwrite it in place. `None` means the existing tipp is final.
    pub async fn upsert_tipp(
        &self,
        player_id: Uuid,
        game_id: Uuid,
        fixture_id: Uuid,
        tipp_home: i32,
        tipp_away: i32,
    ) -> Result<Option<Tipp>, sqlx::Error> {
        sqlx::query_as::<_, Tipp>(
            r#"
            INSERT INTO tipps (id, fixture_id, player_id, game_id, tipp_home, tipp_away)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (fixture_id, player_id, game_id) DO UPDATE SET
                tipp_home = EXCLUDED.tipp_home,
                tipp_away = EXCLUDED.tipp_away,
                updated_at = NOW()
            WHERE tipps.is_final = FALSE
            RETURNING id, fixture_id, player_id, game_id, tipp_home, tipp_away, score, is_final
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(fixture_id)
        .bind(player_id)
        .bind(game_id)
        .bind(tipp_home)
        .bind(tipp_away)
        .fetch_optional(&self.pool)
        .await
    }

    /// Look up a tipp owned by the given player; another player's tipp is not found
    pub async fn find_player_tipp(&self, tipp_id: Uuid, player_id: Uuid) -> Result<Option<Tipp>, sqlx::Error> {
        sqlx::query_as::<_, Tipp>(
            r#"
            SELECT id, fixture_id, player_id, game_id, tipp_home, tipp_away, score, is_final
            FROM tipps
            WHERE id = $1 AND player_id = $2
            "#,
        )
        .bind(tipp_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_goals(
        &self,
        tipp_id: Uuid,
        player_id: Uuid,
        tipp_home: i32,
        tipp_away: i32,
    ) -> Result<Option<Tipp>, sqlx::Error> {
        sqlx::query_as::<_, Tipp>(
            r#"
            UPDATE tipps
            SET tipp_home = $3, tipp_away = $4, updated_at = NOW()
            WHERE id = $1 AND player_id = $2 AND is_final = FALSE
            RETURNING id, fixture_id, player_id, game_id, tipp_home, tipp_away, score, is_final
            "#,
        )
        .bind(tipp_id)
        .bind(player_id)
        .bind(tipp_home)
        .bind(tipp_away)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete_tipp(&self, tipp_id: Uuid, player_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tipps WHERE id = $1 AND player_id = $2 AND is_final = FALSE")
            .bind(tipp_id)
            .bind(player_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn fixture_tipps(&self, game_id: Uuid, fixture_id: Uuid) -> Result<Vec<FixtureTippEntry>, sqlx::Error> {
        sqlx::query_as::<_, FixtureTippEntry>(
            r#"
            SELECT t.id AS tipp_id, t.player_id, p.username, t.tipp_home, t.tipp_away, t.score, t.is_final
            FROM tipps t
            JOIN players p ON p.id = t.player_id
            WHERE t.game_id = $1 AND t.fixture_id = $2
            ORDER BY t.score DESC NULLS LAST, p.username
            "#,
        )
        .bind(game_id)
        .bind(fixture_id)
        .fetch_all(&self.pool)
        .await
    }
}
