use sqlx::PgPool;
use uuid::Uuid;

use crate::models::fixture::{Fixture, FixtureUpsert};

#[derive(Debug, Clone)]
pub struct FixtureQueries {
    pool: PgPool,
}

impl FixtureQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh a fixture keyed on its external id. Kickoff and status
    /// are always overwritten; goals and odds only when the incoming value is
    /// present. League and team references are fixed at insert.
    /// Returns true when the fixture was created.
    pub async fn upsert_fixture(&self, fixture: &FixtureUpsert) -> Result<bool, sqlx::Error> {
        let odds = fixture.odds.unwrap_or_default();

        sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO fixtures (
                id, api_id, league_id, match_start, status, status_short,
                home_team_id, away_team_id, home_goals, away_goals,
                home_odds, draw_odds, away_odds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (api_id) DO UPDATE SET
                match_start = EXCLUDED.match_start,
                status = EXCLUDED.status,
                status_short = EXCLUDED.status_short,
                home_goals = COALESCE(EXCLUDED.home_goals, fixtures.home_goals),
                away_goals = COALESCE(EXCLUDED.away_goals, fixtures.away_goals),
                home_odds = COALESCE(EXCLUDED.home_odds, fixtures.home_odds),
                draw_odds = COALESCE(EXCLUDED.draw_odds, fixtures.draw_odds),
                away_odds = COALESCE(EXCLUDED.away_odds, fixtures.away_odds),
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(fixture.api_id)
        .bind(fixture.league_id)
        .bind(fixture.match_start)
        .bind(&fixture.status)
        .bind(&fixture.status_short)
        .bind(fixture.home_team_id)
        .bind(fixture.away_team_id)
        .bind(fixture.home_goals)
        .bind(fixture.away_goals)
        .bind(odds.home)
        .bind(odds.draw)
        .bind(odds.away)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_fixture(&self, fixture_id: Uuid) -> Result<Option<Fixture>, sqlx::Error> {
        let sql = format!("{} WHERE id = $1", SELECT_FIXTURE);
        let fixture = sqlx::query_as::<_, Fixture>(&sql)
            .bind(fixture_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fixture)
    }

    pub async fn find_by_api_id(&self, api_id: i64) -> Result<Option<Fixture>, sqlx::Error> {
        let sql = format!("{} WHERE api_id = $1", SELECT_FIXTURE);
        let fixture = sqlx::query_as::<_, Fixture>(&sql)
            .bind(api_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fixture)
    }
}

const SELECT_FIXTURE: &str = r#"
    SELECT id, api_id, league_id, match_start, status, status_short,
           home_team_id, away_team_id, home_goals, away_goals,
           home_odds, draw_odds, away_odds
    FROM fixtures
"#;
