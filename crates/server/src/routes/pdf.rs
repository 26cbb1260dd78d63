use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{post, web, HttpResponse};
use studyhelper_common::StudyHelperError;
use studyhelper_media::{extract_pdf_text, render_study_notes};
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{ExtractTextResponse, PdfRequest};
use crate::upload::read_file_field;

const NO_PDF_TEXT_MESSAGE: &str = "No text was found in the PDF";

/// Attachment name derived from the note title
fn pdf_filename(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        "study_notes.pdf".to_string()
    } else {
        format!("{}.pdf", stem)
    }
}

#[post("/extract-pdf-text")]
pub async fn extract_pdf(
    payload: Multipart,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let upload = read_file_field(payload, state.config.max_upload_bytes).await?;
    if !upload.is_pdf() {
        return Err(StudyHelperError::validation("File must be a PDF").into());
    }

    info!("PDF text extraction requested - {} ({} bytes)", upload.filename, upload.data.len());
    let text = web::block(move || extract_pdf_text(&upload.data)).await??;

    let message = if text.is_empty() {
        NO_PDF_TEXT_MESSAGE
    } else {
        "Text extracted successfully"
    };

    Ok(HttpResponse::Ok().json(ExtractTextResponse {
        message: message.to_string(),
        text,
    }))
}

#[post("/generate-pdf")]
pub async fn generate_pdf(req: web::Json<PdfRequest>) -> ApiResult<HttpResponse> {
    let PdfRequest {
        title,
        content,
        note_type,
    } = req.into_inner();
    let filename = pdf_filename(&title);

    info!("PDF requested - '{}' ({} chars)", title, content.len());
    let bytes = web::block(move || render_study_notes(&title, &content, note_type.as_deref())).await??;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}
