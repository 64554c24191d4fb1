// src/routes/games.rs
use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::sync::SyncSettings;
use crate::handlers::game_handler;
use crate::middleware::auth::Claims;
use crate::models::game::CreateGameRequest;

/// Create a game with its leagues and invited players
#[post("")]
async fn create_game(
    request: web::Json<CreateGameRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    game_handler::create_game(request, pool, settings, claims).await
}

/// Games the caller plays in plus open invitations
#[get("")]
async fn list_games(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    game_handler::list_games(pool, settings, claims).await
}

/// Fixtures of all the caller's games for today and tomorrow
#[get("/today")]
async fn today(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    game_handler::today(pool, settings, claims).await
}

#[get("/{game_id}")]
async fn game_detail(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let game_id = path.into_inner();
    game_handler::game_detail(game_id, pool, settings, claims).await
}

#[post("/{game_id}/accept")]
async fn accept_invitation(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let game_id = path.into_inner();
    game_handler::answer_invitation(game_id, true, pool, settings, claims).await
}

#[post("/{game_id}/decline")]
async fn decline_invitation(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let game_id = path.into_inner();
    game_handler::answer_invitation(game_id, false, pool, settings, claims).await
}

/// Everyone's tipps on one fixture of a game
#[get("/{game_id}/fixtures/{fixture_id}/tipps")]
async fn fixture_tipps(
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let (game_id, fixture_id) = path.into_inner();
    game_handler::fixture_tipps(game_id, fixture_id, pool, settings, claims).await
}
