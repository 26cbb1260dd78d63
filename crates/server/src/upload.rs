use actix_multipart::Multipart;
use futures_util::StreamExt;
use studyhelper_common::StudyHelperError;
use tracing::debug;

use crate::error::ApiResult;

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// File read from a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Whether the declared type or extension matches
    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self.filename.to_lowercase().ends_with(".pdf")
    }

    /// Whether the declared type is `image/*`
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false)
    }
}

/// Read the `file` field into memory, enforcing `max_bytes`
pub async fn read_file_field(mut payload: Multipart, max_bytes: usize) -> ApiResult<UploadedFile> {
    while let Some(field) = payload.next().await {
        let mut field = field?;
        let content_disposition = field.content_disposition();

        if content_disposition.get_name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or("unknown")
            .to_string();
        let content_type = field.content_type().map(|ct| ct.essence_str().to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > max_bytes {
                return Err(StudyHelperError::validation(format!(
                    "File exceeds the {} byte upload limit",
                    max_bytes
                ))
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        debug!("Received upload '{}' ({} bytes)", filename, data.len());
        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Err(StudyHelperError::validation("No file uploaded").into())
}
