//! StudyHelper HTTP Server
//!
//! Actix-web REST API for summaries, study questions, word lists, OCR and PDFs

pub mod error;
pub mod routes;
pub mod state;
pub mod types;
pub mod upload;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use studyhelper_common::{AppConfig, Result, StudyHelperError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// JSON extractor with the upload limit and `{detail}` errors
fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError(StudyHelperError::validation(err.to_string())).into())
}

/// App data plus every route
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = state.config.max_upload_bytes;
        cfg.app_data(json_config(limit))
            .app_data(web::PayloadConfig::new(limit))
            .app_data(state);
        routes::register(cfg);
    }
}

fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Build state from config and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_address = config.server_bind_address();
    let state = web::Data::new(AppState::new(config)?);

    info!("Model: {}", state.generator.model());
    info!("OCR engine: {} ({})", state.config.tesseract_cmd, state.config.ocr_lang);
    info!("Server listening on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&state.config.cors_origins))
            .wrap(TracingLogger::default())
            .configure(configure(state.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
