use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::handlers::sync_error_response;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::fixture::SyncMode;
use crate::services::{
    FixtureSyncService, FootballApiClient, ReferenceImportService, ScoringService, UpdateSchedulerService,
};

#[derive(Debug, Deserialize)]
pub struct SyncFixturesRequest {
    pub mode: SyncMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Countries,
    Leagues,
    Teams,
}

/// "Refresh now": today's fixtures, then a scoring pass
#[tracing::instrument(
    name = "Refresh fixtures now",
    skip(pool, client, settings, claims),
    fields(user = %claims.username)
)]
pub async fn refresh_now(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    run_fixture_sync(SyncMode::Live, &pool, &client, &settings).await
}

#[tracing::instrument(
    name = "Sync fixtures",
    skip(request, pool, client, settings, claims),
    fields(user = %claims.username, mode = %request.mode)
)]
pub async fn sync_fixtures(
    request: web::Json<SyncFixturesRequest>,
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    run_fixture_sync(request.mode, &pool, &client, &settings).await
}

async fn run_fixture_sync(
    mode: SyncMode,
    pool: &PgPool,
    client: &FootballApiClient,
    settings: &SyncSettings,
) -> Result<HttpResponse> {
    let sync = FixtureSyncService::new(pool.clone(), client.clone(), settings.clone());
    match sync.sync_fixtures(mode, sync.today()).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            format!("{} fixture sync completed", mode),
            report,
        ))),
        Err(e) => Ok(sync_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Run scheduled update",
    skip(pool, client, settings, claims),
    fields(user = %claims.username)
)]
pub async fn run_scheduled_update(
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let updater = UpdateSchedulerService::new(
        pool.get_ref().clone(),
        client.get_ref().clone(),
        settings.get_ref().clone(),
    );
    match updater.run_scheduled_update(updater.today()).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success("Scheduled update completed", report))),
        Err(e) => {
            tracing::error!("❌ Scheduled update failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to read or write the update schedule")))
        }
    }
}

#[tracing::instrument(
    name = "Recompute scores",
    skip(pool, settings, claims),
    fields(user = %claims.username)
)]
pub async fn recompute_scores(
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let scoring = ScoringService::new(pool.get_ref().clone(), settings.get_ref().clone());
    match scoring.recompute_scores().await {
        Ok(evaluated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Scores recomputed",
            json!({ "tipps_evaluated": evaluated }),
        ))),
        Err(e) => Ok(sync_error_response(e)),
    }
}

#[tracing::instrument(
    name = "Import reference data",
    skip(pool, client, settings, claims),
    fields(user = %claims.username, kind = ?kind)
)]
pub async fn import_reference(
    kind: ReferenceKind,
    pool: web::Data<PgPool>,
    client: web::Data<FootballApiClient>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let importer = ReferenceImportService::new(pool.get_ref().clone(), client.get_ref().clone());
    let relevant = &settings.relevant_leagues;

    let result = match kind {
        ReferenceKind::Countries => importer.import_countries().await,
        ReferenceKind::Leagues => importer.import_leagues(relevant).await,
        ReferenceKind::Teams => importer.import_teams(relevant).await,
    };

    match result {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success("Import completed", report))),
        Err(e) => Ok(sync_error_response(e)),
    }
}
