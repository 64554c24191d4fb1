// src/routes/sync.rs
use actix_web::{post, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::handlers::sync_handler::{self, ReferenceKind, SyncFixturesRequest};
use crate::middleware::auth::Claims;
use crate::services::FootballApiClient;

/// Today's fixtures, available to every player
#[post("/refresh")]
async fn refresh_now(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::refresh_now(pool, client, settings, claims).await
}

#[post("/fixtures")]
async fn sync_fixtures(
    request: web::Json<SyncFixturesRequest>,
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::sync_fixtures(request, pool, client, settings, claims).await
}

#[post("/scheduled")]
async fn run_scheduled_update(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::run_scheduled_update(pool, client, settings, claims).await
}

#[post("/scores")]
async fn recompute_scores(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::recompute_scores(pool, settings, claims).await
}

#[post("/countries")]
async fn import_countries(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::import_reference(ReferenceKind::Countries, pool, client, settings, claims).await
}

#[post("/leagues")]
async fn import_leagues(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::import_reference(ReferenceKind::Leagues, pool, client, settings, claims).await
}

#[post("/teams")]
async fn import_teams(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    sync_handler::import_reference(ReferenceKind::Teams, pool, client, settings, claims).await
}
