use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::game::{
    CreateGameRequest, Game, GameListEntry, GameMembership, LeagueProgress, MembershipStatus, Player,
    RankingEntry,
};

const SELECT_GAME: &str = r#"
    SELECT id, name, pts_exact, pts_difference, pts_winner, pts_wrong, creator_id, created_at
    FROM games
"#;

#[derive(Debug, Clone)]
pub struct GameQueries {
    pool: PgPool,
}

impl GameQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the player profile of an authenticated user on first use;
    /// afterwards keep its username and picture in step with the login.
    pub async fn ensure_player(
        &self,
        user_id: Uuid,
        username: &str,
        pic: Option<&str>,
    ) -> Result<Player, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (id, user_id, username, pic)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                pic = COALESCE(EXCLUDED.pic, players.pic)
            RETURNING id, user_id, username, pic, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(username)
        .bind(pic)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_player_by_user(&self, user_id: Uuid) -> Result<Option<Player>, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            "SELECT id, user_id, username, pic, created_at FROM players WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert the game, its leagues and its memberships in one transaction.
    /// The creator joins as `creator`, everybody else starts out `invited`.
    pub async fn create_game(&self, creator_id: Uuid, request: &CreateGameRequest) -> Result<Game, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let game_id = Uuid::new_v4();
        let game = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (id, name, pts_exact, pts_difference, pts_winner, pts_wrong, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, pts_exact, pts_difference, pts_winner, pts_wrong, creator_id, created_at
            "#,
        )
        .bind(game_id)
        .bind(request.name.trim())
        .bind(request.pts_exact)
        .bind(request.pts_difference)
        .bind(request.pts_winner)
        .bind(request.pts_wrong)
        .bind(creator_id)
        .fetch_one(&mut *tx)
        .await?;

        for league_id in &request.league_ids {
            sqlx::query(
                "INSERT INTO game_leagues (game_id, league_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(game_id)
            .bind(league_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("INSERT INTO player_games (game_id, player_id, status) VALUES ($1, $2, $3)")
            .bind(game_id)
            .bind(creator_id)
            .bind(MembershipStatus::Creator)
            .execute(&mut *tx)
            .await?;

        for player_id in request.player_ids.iter().filter(|id| **id != creator_id) {
            sqlx::query(
                r#"
                INSERT INTO player_games (game_id, player_id, status)
                VALUES ($1, $2, $3)
                ON CONFLICT (game_id, player_id) DO NOTHING
                "#,
            )
            .bind(game_id)
            .bind(player_id)
            .bind(MembershipStatus::Invited)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Created game {} with {} leagues and {} invitations",
            game.id,
            request.league_ids.len(),
            request.player_ids.len()
        );
        Ok(game)
    }

    pub async fn get_game(&self, game_id: Uuid) -> Result<Option<Game>, sqlx::Error> {
        let sql = format!("{} WHERE id = $1", SELECT_GAME);
        let game = sqlx::query_as::<_, Game>(&sql)
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    /// Every game the player belongs to in any status, newest first
    pub async fn games_for_player(&self, player_id: Uuid) -> Result<Vec<GameListEntry>, sqlx::Error> {
        sqlx::query_as::<_, GameListEntry>(
            r#"
            SELECT g.id, g.name, pg.status, g.creator_id
            FROM games g
            JOIN player_games pg ON pg.game_id = g.id
            WHERE pg.player_id = $1
            ORDER BY g.created_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn membership(&self, game_id: Uuid, player_id: Uuid) -> Result<Option<GameMembership>, sqlx::Error> {
        sqlx::query_as::<_, GameMembership>(
            "SELECT game_id, player_id, status FROM player_games WHERE game_id = $1 AND player_id = $2",
        )
        .bind(game_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Answer an open invitation. Returns false when there was none.
    pub async fn transition_invitation(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        to: MembershipStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE player_games
            SET status = $3, updated_at = NOW()
            WHERE game_id = $1 AND player_id = $2 AND status = 'invited'
            "#,
        )
        .bind(game_id)
        .bind(player_id)
        .bind(to)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn fixture_in_game(&self, game_id: Uuid, fixture_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM fixtures f
                JOIN game_leagues gl ON gl.league_id = f.league_id
                WHERE gl.game_id = $1 AND f.id = $2
            )
            "#,
        )
        .bind(game_id)
        .bind(fixture_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Total points per visible member. Members without any scored tipp rank with 0.
    pub async fn rankings(&self, game_id: Uuid) -> Result<Vec<RankingEntry>, sqlx::Error> {
        sqlx::query_as::<_, RankingEntry>(
            r#"
            SELECT
                p.id AS player_id,
                p.username,
                COALESCE(SUM(t.score), 0)::BIGINT AS total_score,
                COUNT(t.score) AS scored_tipps
            FROM player_games pg
            JOIN players p ON p.id = pg.player_id
            LEFT JOIN tipps t ON t.player_id = pg.player_id AND t.game_id = pg.game_id
            WHERE pg.game_id = $1 AND pg.status IN ('creator', 'active')
            GROUP BY p.id, p.username
            ORDER BY total_score DESC, p.username ASC
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Finished and outstanding fixture counts per league of the game
    pub async fn league_progress(
        &self,
        game_id: Uuid,
        final_status_codes: &[String],
    ) -> Result<Vec<LeagueProgress>, sqlx::Error> {
        sqlx::query_as::<_, LeagueProgress>(
            r#"
            SELECT
                l.id AS league_id,
                l.name,
                l.logo,
                COUNT(f.id) FILTER (WHERE f.status_short = ANY($2)) AS finished,
                COUNT(f.id) FILTER (WHERE f.status_short IS NULL OR NOT (f.status_short = ANY($2))) AS to_play
            FROM game_leagues gl
            JOIN leagues l ON l.id = gl.league_id
            LEFT JOIN fixtures f ON f.league_id = l.id
            WHERE gl.game_id = $1
            GROUP BY l.id, l.name, l.logo
            ORDER BY l.name
            "#,
        )
        .bind(game_id)
        .bind(final_status_codes)
        .fetch_all(&self.pool)
        .await
    }
}
