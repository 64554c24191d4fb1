use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::handlers::player_handler;
use crate::middleware::auth::Claims;
use crate::models::game::EnsurePlayerRequest;

/// Create or refresh the caller's player profile
#[post("/me")]
async fn ensure_player(
    request: web::Json<EnsurePlayerRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    player_handler::ensure_player(request, pool, settings, claims).await
}

#[get("/me")]
async fn get_player(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    player_handler::get_player(pool, settings, claims).await
}
