use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use studyhelper_common::StudyHelperError;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::ExtractTextResponse;
use crate::upload::read_file_field;

/// OCR an uploaded image
#[post("/process-image")]
pub async fn process_image(
    payload: Multipart,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let upload = read_file_field(payload, state.config.max_upload_bytes).await?;
    if !upload.is_image() {
        return Err(StudyHelperError::validation("File must be an image").into());
    }

    info!("OCR requested - {} ({} bytes)", upload.filename, upload.data.len());
    let outcome = state.ocr.extract_text(&upload.data).await?;

    Ok(HttpResponse::Ok().json(ExtractTextResponse {
        message: outcome.message().to_string(),
        text: outcome.into_text(),
    }))
}
