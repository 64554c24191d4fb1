use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::ReferenceQueries;
use crate::models::common::ApiResponse;

/// Leagues a game can be created for
#[tracing::instrument(name = "List leagues", skip(pool))]
pub async fn list_leagues(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let queries = ReferenceQueries::new(pool.get_ref().clone());
    match queries.list_leagues().await {
        Ok(leagues) => Ok(HttpResponse::Ok().json(ApiResponse::success("Leagues retrieved", leagues))),
        Err(e) => {
            tracing::error!("Failed to list leagues: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to list leagues")))
        }
    }
}
