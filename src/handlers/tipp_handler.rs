use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::sync::SyncSettings;
use crate::handlers::{resolve_player, tipp_error_response};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::tipp::{SubmitTippRequest, TippListQuery, UpdateTippRequest};
use crate::services::TippService;

#[tracing::instrument(
    name = "List tipps",
    skip(query, pool, settings, claims),
    fields(user = %claims.username, game_id = ?query.game_id)
)]
pub async fn list_tipps(
    query: web::Query<TippListQuery>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let tipps = TippService::new(pool.get_ref().clone());
    match tipps.query_tipps(&player, &query).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success("Tipps retrieved", rows))),
        Err(e) => Ok(tipp_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Submit tipp",
    skip(request, pool, settings, claims),
    fields(
        user = %claims.username,
        game_id = %request.game_id,
        fixture_id = %request.fixture_id
    )
)]
pub async fn submit_tipp(
    request: web::Json<SubmitTippRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let tipps = TippService::new(pool.get_ref().clone());
    match tipps.submit_tipp(&player, &request, Utc::now()).await {
        Ok(tipp) => Ok(HttpResponse::Ok().json(ApiResponse::success("Tipp saved", tipp))),
        Err(e) => {
            tracing::info!("Tipp rejected: {}", e);
            Ok(tipp_error_response(e))
        }
    }
}

#[tracing::instrument(
    name = "Update tipp",
    skip(request, pool, settings, claims),
    fields(user = %claims.username, tipp_id = %tipp_id)
)]
pub async fn update_tipp(
    tipp_id: Uuid,
    request: web::Json<UpdateTippRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let tipps = TippService::new(pool.get_ref().clone());
    match tipps
        .update_tipp(&player, tipp_id, request.tipp_home, request.tipp_away, Utc::now())
        .await
    {
        Ok(tipp) => Ok(HttpResponse::Ok().json(ApiResponse::success("Tipp updated", tipp))),
        Err(e) => Ok(tipp_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Delete tipp",
    skip(pool, settings, claims),
    fields(user = %claims.username, tipp_id = %tipp_id)
)]
pub async fn delete_tipp(
    tipp_id: Uuid,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let player = match resolve_player(&pool, &settings, &claims).await {
        Ok(player) => player,
        Err(response) => return Ok(response),
    };

    let tipps = TippService::new(pool.get_ref().clone());
    match tipps.delete_tipp(&player, tipp_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Tipp deleted"))),
        Err(e) => Ok(tipp_error_response(e)),
    }
}
