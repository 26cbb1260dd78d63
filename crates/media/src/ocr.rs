//! OCR via the tesseract executable

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use std::process::Stdio;
use studyhelper_common::{AppConfig, Result, StudyHelperError};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::preprocess::preprocess;

/// Message returned when OCR finds nothing
pub const NO_TEXT_MESSAGE: &str = "No text was detected in the image";

/// Message returned on successful extraction
pub const TEXT_FOUND_MESSAGE: &str = "Text extracted successfully";

/// OCR result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Recognised text, trimmed and non-empty
    Text(String),

    /// Engine ran but found nothing
    NoText,
}

impl OcrOutcome {
    /// Classify raw engine output
    pub fn from_raw(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            Self::NoText
        } else {
            Self::Text(text.to_string())
        }
    }

    /// Human-readable status
    pub fn message(&self) -> &'static str {
        match self {
            Self::Text(_) => TEXT_FOUND_MESSAGE,
            Self::NoText => NO_TEXT_MESSAGE,
        }
    }

    /// Extracted text, empty for `NoText`
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::NoText => String::new(),
        }
    }
}

/// Common trait for OCR engines
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognise text in an encoded image (PNG, JPEG, ...)
    async fn extract_text(&self, image: &[u8]) -> Result<OcrOutcome>;
}

/// Tesseract-backed recognizer
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
    lang: String,
}

impl TesseractOcr {
    /// Create new recognizer
    pub fn new(command: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            lang: lang.into(),
        }
    }

    /// Create from application config
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.tesseract_cmd.clone(), config.ocr_lang.clone())
    }

    /// Pipe a PNG through `tesseract stdin stdout`
    async fn run_tesseract(&self, png: &[u8]) -> Result<String> {
        debug!("Running {} (lang: {})", self.command, self.lang);

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "--psm", "6", "--oem", "3", "-l", self.lang.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| StudyHelperError::ocr(format!("Failed to run {}: {}", self.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(png)
                .await
                .map_err(|e| StudyHelperError::ocr(format!("Failed to send image to tesseract: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| StudyHelperError::ocr(format!("Tesseract did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Tesseract failed: {}", stderr.trim());
            return Err(StudyHelperError::ocr(format!(
                "Tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl TextRecognizer for TesseractOcr {
    async fn extract_text(&self, image: &[u8]) -> Result<OcrOutcome> {
        info!("Starting OCR - Image size: {} bytes", image.len());

        let bytes = image.to_vec();
        let png = tokio::task::spawn_blocking(move || prepare_image(&bytes))
            .await
            .map_err(|e| anyhow::anyhow!("Image preprocessing task failed: {}", e))??;

        let raw = self.run_tesseract(&png).await?;
        let outcome = OcrOutcome::from_raw(&raw);

        match &outcome {
            OcrOutcome::Text(text) => info!("OCR completed - {} chars", text.len()),
            OcrOutcome::NoText => info!("OCR completed - no text detected"),
        }

        Ok(outcome)
    }
}

/// Decode an uploaded image
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| StudyHelperError::validation(format!("Unsupported or corrupt image: {}", e)))
}

/// Decode, preprocess and re-encode as PNG
pub fn prepare_image(bytes: &[u8]) -> Result<Vec<u8>> {
    let image = decode_image(bytes)?;
    encode_png(&preprocess(&image))
}

fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| StudyHelperError::ocr(format!("Failed to encode image: {}", e)))?;
    Ok(buf)
}
