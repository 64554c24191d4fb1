use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::sync::SyncSettings;
use crate::handlers::{game_error_response, resolve_player, tipp_error_response};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::game::CreateGameRequest;
use crate::services::{GameService, TippService};

#[tracing::instrument(
    name = "Create game",
    skip(request, pool, settings, claims),
    fields(user = %claims.username, game_name = %request.name)
)]
pub async fn create_game(
    request: web::Json<CreateGameRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match games.create_game(&player, &request).await {
        Ok(game) => Ok(HttpResponse::Created().json(ApiResponse::success("Game created", game))),
        Err(e) => Ok(game_error_response(e)),
    }
}

#[tracing::instrument(
    name = "List games",
    skip(pool, settings, claims),
    fields(user = %claims.username)
)]
pub async fn list_games(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match games.list_games(&player).await {
        Ok(overview) => Ok(HttpResponse::Ok().json(ApiResponse::success("Games retrieved", overview))),
        Err(e) => Ok(game_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Game detail",
    skip(pool, settings, claims),
    fields(user = %claims.username, game_id = %game_id)
)]
pub async fn game_detail(
    game_id: Uuid,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match games.game_detail(&player, game_id, Utc::now()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success("Game retrieved", detail))),
        Err(e) => Ok(game_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Answer invitation",
    skip(pool, settings, claims),
    fields(user = %claims.username, game_id = %game_id, accept = accept)
)]
pub async fn answer_invitation(
    game_id: Uuid,
    accept: bool,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    let result = if accept {
        games.accept_invitation(&player, game_id).await
    } else {
        games.decline_invitation(&player, game_id).await
    };

    match result {
        Ok(()) => {
            let message = if accept { "Invitation accepted" } else { "Invitation declined" };
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message(message)))
        }
        Err(e) => Ok(game_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Fixture tipps",
    skip(pool, settings, claims),
    fields(user = %claims.username, game_id = %game_id, fixture_id = %fixture_id)
)]
pub async fn fixture_tipps(
    game_id: Uuid,
    fixture_id: Uuid,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let tipps = TippService::new(pool.get_ref().clone());
    match tipps.fixture_tipps(&player, game_id, fixture_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success("Tipps retrieved", entries))),
        Err(e) => Ok(tipp_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Today",
    skip(pool, settings, claims),
    fields(user = %claims.username)
)]
pub async fn today(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let games = GameService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match games.today(&player, Utc::now()).await {
        Ok((started, to_start)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Today's fixtures retrieved",
            json!({
                "fixtures_started": started,
                "fixtures_to_start": to_start,
            }),
        ))),
        Err(e) => Ok(game_error_response(e)),
    }
}
