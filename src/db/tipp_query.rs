use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::tipp::TippView;

const TIPP_VIEW_SELECT: &str = r#"
    SELECT
        f.id AS fixture_id, g.id AS game_id, pg.player_id AS player_id,
        f.match_start, f.status, f.status_short, f.home_goals, f.away_goals,
        f.home_odds, f.draw_odds, f.away_odds,
        ht.name AS home_team_name, ht.logo AS home_team_logo,
        awt.name AS away_team_name, awt.logo AS away_team_logo,
        l.name AS league_name, l.logo AS league_logo,
        g.name AS game_name,
        t.id AS tipp_id, t.tipp_home, t.tipp_away, t.score, t.is_final
    FROM fixtures f
    JOIN teams ht ON ht.id = f.home_team_id
    JOIN teams awt ON awt.id = f.away_team_id
    JOIN leagues l ON l.id = f.league_id
    JOIN game_leagues gl ON gl.league_id = l.id
    JOIN games g ON g.id = gl.game_id
    JOIN player_games pg ON pg.game_id = g.id
    LEFT JOIN tipps t
        ON t.fixture_id = f.id AND t.game_id = g.id AND t.player_id = pg.player_id
    WHERE pg.status IN ('creator', 'active')
"#;

/// Read-only view of the fixtures a player can predict, per game, joined with
/// the player's own tipp. Invited and declined memberships see nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TippQuery {
    pub player_id: Uuid,
    pub game_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TippQuery {
    pub fn for_player(player_id: Uuid) -> Self {
        Self {
            player_id,
            game_id: None,
            from: None,
            to: None,
        }
    }

    pub fn in_game(mut self, game_id: Uuid) -> Self {
        self.game_id = Some(game_id);
        self
    }

    /// Both bounds are inclusive
    pub fn starting_between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(TIPP_VIEW_SELECT);

        builder.push(" AND pg.player_id = ").push_bind(self.player_id);
        if let Some(game_id) = self.game_id {
            builder.push(" AND g.id = ").push_bind(game_id);
        }
        if let Some(from) = self.from {
            builder.push(" AND f.match_start >= ").push_bind(from);
        }
        if let Some(to) = self.to {
            builder.push(" AND f.match_start <= ").push_bind(to);
        }
        builder.push(" ORDER BY f.match_start ASC, g.name ASC, f.id ASC");

        builder
    }

    pub async fn fetch(&self, pool: &PgPool) -> Result<Vec<TippView>, sqlx::Error> {
        let mut builder = self.build();
        let rows = builder
            .build_query_as::<TippView>()
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}
