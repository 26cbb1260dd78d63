use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studyhelper_llm::{NormalizedAnswer, NoteType, Task};

/// Body of `/summarize` and `/generate-questions`
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Generic generation request
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Source text, or a theme for word sets
    #[serde(default)]
    pub text: String,

    /// `summarize`, `questions` or `word_sets`
    pub task: String,

    /// Word-set category
    #[serde(default)]
    pub category: Option<String>,
}

/// PDF rendering request
#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub note_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub note_type: NoteType,
    pub foreign_terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
    pub note_type: NoteType,
    pub key_terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub task: Task,
    pub result: NormalizedAnswer,
}

/// OCR / PDF text extraction result
#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub message: String,
    pub text: String,
}

/// Word list envelope
#[derive(Debug, Serialize)]
pub struct WordsResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> WordsResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
