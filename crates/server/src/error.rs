use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use studyhelper_common::StudyHelperError;
use tracing::{error, warn};

use crate::types::ErrorResponse;

/// HTTP-facing wrapper around [`StudyHelperError`]
#[derive(Debug)]
pub struct ApiError(pub StudyHelperError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<StudyHelperError> for ApiError {
    fn from(err: StudyHelperError) -> Self {
        Self(err)
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        Self(anyhow::anyhow!("Blocking task failed: {}", err).into())
    }
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        Self(StudyHelperError::validation(format!("Invalid multipart payload: {}", err)))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status.as_u16(), self.0);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self.0);
        }

        HttpResponse::build(status).json(ErrorResponse {
            detail: self.0.to_string(),
        })
    }
}

/// Handler result
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(StudyHelperError::validation("bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(StudyHelperError::gateway(Some(429), "rate limited", "")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError(StudyHelperError::ocr("missing")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_has_detail() {
        let response = ApiError(StudyHelperError::validation("Text must not be empty")).error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["detail"], "Invalid input: Text must not be empty");
    }
}
