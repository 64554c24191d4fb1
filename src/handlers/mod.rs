use actix_web::HttpResponse;
use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::errors::{GameError, SyncError, TippError};
use crate::models::game::Player;
use crate::services::GameService;

pub mod backend_health_handler;
pub mod game_handler;
pub mod league_handler;
pub mod player_handler;
pub mod sync_handler;
pub mod tipp_handler;

/// The player profile behind the token, created on first contact
pub(crate) async fn resolve_player(
    pool: &PgPool,
    settings: &SyncSettings,
    claims: &Claims,
) -> Result<Player, HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Err(HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid user ID")));
    };

    let games = GameService::new(pool.clone(), settings.clone());
    match games.player_for_user(user_id).await {
        Ok(player) => Ok(player),
        Err(GameError::PlayerNotFound) => games
            .ensure_player(user_id, &claims.username, None)
            .await
            .map_err(game_error_response),
        Err(e) => Err(game_error_response(e)),
    }
}

pub(crate) fn tipp_error_response(error: TippError) -> HttpResponse {
    let body = ApiResponse::<()>::error(error.to_string());
    match error {
        TippError::MatchStarted | TippError::InvalidGoals | TippError::FixtureNotInGame => {
            HttpResponse::BadRequest().json(body)
        }
        TippError::NotFound | TippError::FixtureNotFound => HttpResponse::NotFound().json(body),
        TippError::NotMember => HttpResponse::Forbidden().json(body),
        TippError::AlreadyFinal => HttpResponse::Conflict().json(body),
        TippError::Database(e) => {
            tracing::error!("Database error while handling tipp: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Database error"))
        }
    }
}

pub(crate) fn game_error_response(error: GameError) -> HttpResponse {
    let body = ApiResponse::<()>::error(error.to_string());
    match error {
        GameError::InvalidPoints | GameError::InvalidName => HttpResponse::BadRequest().json(body),
        GameError::NotFound | GameError::PlayerNotFound => HttpResponse::NotFound().json(body),
        GameError::InvalidTransition => HttpResponse::Conflict().json(body),
        GameError::Database(e) => {
            tracing::error!("Database error while handling game: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Database error"))
        }
    }
}

/// Provider trouble is a bad gateway; the rows written before it stay written
pub(crate) fn sync_error_response(error: SyncError) -> HttpResponse {
    tracing::error!("❌ Data sync failed: {}", error);
    let body = ApiResponse::<()>::error(error.to_string());
    if error.is_upstream() {
        HttpResponse::BadGateway().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_tipp_errors_map_to_status_codes() {
        assert_eq!(tipp_error_response(TippError::MatchStarted).status(), StatusCode::BAD_REQUEST);
        assert_eq!(tipp_error_response(TippError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(tipp_error_response(TippError::NotMember).status(), StatusCode::FORBIDDEN);
        assert_eq!(tipp_error_response(TippError::AlreadyFinal).status(), StatusCode::CONFLICT);
        assert_eq!(
            tipp_error_response(TippError::Database(sqlx::Error::RowNotFound)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_game_errors_map_to_status_codes() {
        assert_eq!(game_error_response(GameError::InvalidPoints).status(), StatusCode::BAD_REQUEST);
        assert_eq!(game_error_response(GameError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(game_error_response(GameError::InvalidTransition).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_sync_failure_is_bad_gateway() {
        let upstream = SyncError::api(
            crate::models::errors::FootballApiError::Timeout { url: "http://provider".to_string() },
            0,
        );
        assert_eq!(sync_error_response(upstream).status(), StatusCode::BAD_GATEWAY);

        let storage = SyncError::database(sqlx::Error::PoolTimedOut, 4);
        assert_eq!(sync_error_response(storage).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
