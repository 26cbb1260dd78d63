//! StudyHelper Media
//!
//! Image OCR (preprocessing + tesseract) and PDF rendering/extraction

pub mod ocr;
pub mod pdf;
pub mod preprocess;

// Re-export main types
pub use ocr::{OcrOutcome, TesseractOcr, TextRecognizer, NO_TEXT_MESSAGE};
pub use pdf::{extract_pdf_text, render_study_notes, DEFAULT_NOTE_TYPE};
pub use preprocess::preprocess;
