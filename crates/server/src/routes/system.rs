use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness probe
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        model: state.generator.model().to_string(),
        timestamp: Utc::now(),
    })
}
