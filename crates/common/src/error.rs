/// Study helper error types
#[derive(Debug, thiserror::Error)]
pub enum StudyHelperError {
    /// Missing or invalid configuration (credentials, URLs, limits)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied something we cannot work with
    #[error("Invalid input: {0}")]
    Validation(String),

    /// LLM provider returned a non-2xx status or an unusable body
    #[error("LLM gateway error: {message}")]
    Gateway {
        /// HTTP status, if a response was received at all
        status: Option<u16>,
        /// Short description
        message: String,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// OCR engine failure
    #[error("OCR error: {0}")]
    Ocr(String),

    /// PDF rendering or extraction failure
    #[error("PDF error: {0}")]
    Pdf(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudyHelperError {
    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create gateway error
    pub fn gateway<S: Into<String>, B: Into<String>>(status: Option<u16>, message: S, body: B) -> Self {
        Self::Gateway {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create OCR error
    pub fn ocr<S: Into<String>>(msg: S) -> Self {
        Self::Ocr(msg.into())
    }

    /// Create PDF error
    pub fn pdf<S: Into<String>>(msg: S) -> Self {
        Self::Pdf(msg.into())
    }

    /// Whether this error came from the LLM provider
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}

// HTTP response conversion (used by the actix-web layer)
impl StudyHelperError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Config(_) => 500,
            Self::Gateway { .. } => 502,
            Self::Ocr(_) => 500,
            Self::Pdf(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StudyHelperError::validation("bad task").status_code(), 400);
        assert_eq!(StudyHelperError::config("no key").status_code(), 500);
        assert_eq!(
            StudyHelperError::gateway(Some(429), "rate limited", "{}").status_code(),
            502
        );
    }

    #[test]
    fn test_gateway_display() {
        let err = StudyHelperError::gateway(Some(429), "HTTP 429 from provider", "slow down");
        assert_eq!(err.to_string(), "LLM gateway error: HTTP 429 from provider");

        let err = StudyHelperError::gateway(None, "connection refused", "");
        assert_eq!(err.to_string(), "LLM gateway error: connection refused");
        assert!(err.is_gateway());
    }
}
