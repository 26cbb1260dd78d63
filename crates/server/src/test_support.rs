//! Fakes shared by handler tests

use actix_web::web;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use studyhelper_common::{AppConfig, Result, StudyHelperError};
use studyhelper_llm::{ChatCompletion, CompletionResult, PromptEnvelope};
use studyhelper_media::{OcrOutcome, TextRecognizer};

use crate::state::AppState;

pub const BOUNDARY: &str = "studyhelper-test-boundary";

/// Chat backend with a canned reply (or a canned HTTP failure)
pub struct FakeChat {
    reply: std::result::Result<String, u16>,
    pub prompts: Mutex<Vec<PromptEnvelope>>,
}

impl FakeChat {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete(&self, envelope: &PromptEnvelope) -> Result<CompletionResult> {
        self.prompts.lock().unwrap().push(envelope.clone());
        match &self.reply {
            Ok(text) => Ok(CompletionResult {
                raw_reply_text: text.clone(),
                http_status: 200,
            }),
            Err(status) => Err(StudyHelperError::gateway(
                Some(*status),
                format!("LLM provider returned HTTP {}", status),
                r#"{"error":{"message":"Rate limit exceeded"}}"#,
            )),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// OCR backend with a canned outcome
pub struct FakeOcr(pub OcrOutcome);

#[async_trait]
impl TextRecognizer for FakeOcr {
    async fn extract_text(&self, _image: &[u8]) -> Result<OcrOutcome> {
        Ok(self.0.clone())
    }
}

pub fn state_with(chat: Arc<FakeChat>, ocr: OcrOutcome) -> web::Data<AppState> {
    web::Data::new(AppState::with_backends(
        AppConfig::default(),
        chat,
        Arc::new(FakeOcr(ocr)),
    ))
}

pub fn state(chat: Arc<FakeChat>) -> web::Data<AppState> {
    state_with(chat, OcrOutcome::NoText)
}

/// Single-file multipart body and its content type header value
pub fn multipart(field: &str, filename: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
