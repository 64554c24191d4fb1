use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::handlers::game_error_response;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::game::EnsurePlayerRequest;
use crate::services::GameService;

/// Create or refresh the caller's player profile
#[tracing::instrument(
    name = "Ensure player",
    skip(request, pool, settings, claims),
    fields(user = %claims.username)
)]
pub async fn ensure_player(
    request: web::Json<EnsurePlayerRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid user ID")));
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match games
        .ensure_player(user_id, &claims.username, request.pic.as_deref())
        .await
    {
        Ok(player) => Ok(HttpResponse::Ok().json(ApiResponse::success("Player ready", player))),
        Err(e) => Ok(game_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Get own player",
    skip(pool, settings, claims),
    fields(user = %claims.username)
)]
pub async fn get_player(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid user ID")));
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match games.player_for_user(user_id).await {
        Ok(player) => Ok(HttpResponse::Ok().json(ApiResponse::success("Player retrieved", player))),
        Err(e) => Ok(game_error_response(e)),
    }
}
