use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::reference::{CountryRow, League, LeagueRow, TeamRow};

/// Keyed upserts and lookups over countries, leagues and teams
#[derive(Debug, Clone)]
pub struct ReferenceQueries {
    pool: PgPool,
}

impl ReferenceQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a country unless one with the same name exists. Existing
    /// countries are never updated. Returns true when a row was created.
    pub async fn insert_country_if_absent(&self, country: &CountryRow) -> Result<bool, sqlx::Error> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO countries (id, name, code, flag)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&country.name)
        .bind(&country.code)
        .bind(&country.flag)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    pub async fn country_ids_by_name(&self) -> Result<HashMap<String, Uuid>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, Uuid)>("SELECT name, id FROM countries")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Upsert by external id. New leagues start out as current. Returns true on insert.
    pub async fn upsert_league(&self, league: &LeagueRow, country_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO leagues (id, api_id, name, season, season_start, season_end, is_current, logo, country_id)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8)
            ON CONFLICT (api_id) DO UPDATE SET
                name = EXCLUDED.name,
                season = EXCLUDED.season,
                season_start = EXCLUDED.season_start,
                season_end = EXCLUDED.season_end,
                logo = EXCLUDED.logo,
                country_id = EXCLUDED.country_id,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(league.api_id)
        .bind(&league.name)
        .bind(league.season)
        .bind(league.season_start)
        .bind(league.season_end)
        .bind(&league.logo)
        .bind(country_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Upsert by external id. Returns true on insert.
    pub async fn upsert_team(&self, team: &TeamRow, country_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO teams (id, api_id, name, logo, country_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (api_id) DO UPDATE SET
                name = EXCLUDED.name,
                logo = EXCLUDED.logo,
                country_id = EXCLUDED.country_id,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(team.api_id)
        .bind(&team.name)
        .bind(&team.logo)
        .bind(country_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn league_ids_by_api_id(&self) -> Result<HashMap<i64, Uuid>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i64, Uuid)>("SELECT api_id, id FROM leagues")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn team_ids_by_api_id(&self) -> Result<HashMap<i64, Uuid>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i64, Uuid)>("SELECT api_id, id FROM teams")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Relevant leagues stored locally whose teams and fixtures were never
    /// imported, including those left behind by an interrupted refresh
    pub async fn leagues_awaiting_teams(&self, relevant: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT api_id
            FROM leagues
            WHERE api_id = ANY($1) AND teams_imported_at IS NULL
            ORDER BY api_id
            "#,
        )
        .bind(relevant)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn mark_teams_imported(&self, api_ids: &[i64]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE leagues
            SET teams_imported_at = NOW()
            WHERE api_id = ANY($1) AND teams_imported_at IS NULL
            "#,
        )
        .bind(api_ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_leagues(&self) -> Result<Vec<League>, sqlx::Error> {
        sqlx::query_as::<_, League>(
            r#"
            SELECT id, api_id, name, season, season_start, season_end, is_current, logo, country_id, updated_at
            FROM leagues
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
