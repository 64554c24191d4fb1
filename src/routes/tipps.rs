use actix_web::{delete, get, post, put, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::sync::SyncSettings;
use crate::handlers::tipp_handler;
use crate::middleware::auth::Claims;
use crate::models::tipp::{SubmitTippRequest, TippListQuery, UpdateTippRequest};

/// Fixtures visible to the caller with their own tipps, by kickoff
#[get("")]
async fn list_tipps(
    query: web::Query<TippListQuery>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    tipp_handler::list_tipps(query, pool, settings, claims).await
}

#[post("")]
async fn submit_tipp(
    request: web::Json<SubmitTippRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    tipp_handler::submit_tipp(request, pool, settings, claims).await
}

#[put("/{tipp_id}")]
async fn update_tipp(
    path: web::Path<Uuid>,
    request: web::Json<UpdateTippRequest>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let tipp_id = path.into_inner();
    tipp_handler::update_tipp(tipp_id, request, pool, settings, claims).await
}

#[delete("/{tipp_id}")]
async fn delete_tipp(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    settings: web::Data<SyncSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let tipp_id = path.into_inner();
    tipp_handler::delete_tipp(tipp_id, pool, settings, claims).await
}
