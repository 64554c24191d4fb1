use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::league_handler;

#[get("")]
async fn list_leagues(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    league_handler::list_leagues(pool).await
}
