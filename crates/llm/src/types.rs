use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use studyhelper_common::StudyHelperError;

/// Generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Concise summary of the text
    Summarize,
    /// Five comprehension questions
    Questions,
    /// Vocabulary lists per difficulty
    WordSets,
}

impl Task {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Questions => "questions",
            Self::WordSets => "word_sets",
        }
    }

    /// Sampling temperature sent with the request
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Summarize => 0.7,
            Self::Questions => 0.8,
            Self::WordSets => 0.9,
        }
    }

    /// Completion budget, also reserved out of the context window
    pub fn max_output_tokens(&self) -> usize {
        match self {
            Self::Summarize => 500,
            Self::Questions => 500,
            Self::WordSets => 600,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = StudyHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summarize" | "summary" => Ok(Self::Summarize),
            "questions" | "generate-questions" | "generate_questions" => Ok(Self::Questions),
            "word_sets" | "word-sets" | "words" => Ok(Self::WordSets),
            other => Err(StudyHelperError::validation(format!(
                "Unknown task '{}'. Must be one of: summarize, questions, word_sets",
                other
            ))),
        }
    }
}

/// Word difficulty category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All categories in display order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lowercase name, also the JSON key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Human description used in prompts
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Easy => "common, everyday",
            Self::Medium => "intermediate",
            Self::Hard => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = StudyHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(StudyHelperError::validation(
                "Invalid category. Must be one of: easy, medium, hard",
            )),
        }
    }
}

/// One incoming generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Text supplied by the client (a theme for word sets)
    pub raw_text: String,

    /// What to generate
    pub task: Task,

    /// Restrict word sets to one category
    pub category: Option<Difficulty>,
}

impl GenerationRequest {
    /// Create new request
    pub fn new(raw_text: impl Into<String>, task: Task) -> Self {
        Self {
            raw_text: raw_text.into(),
            task,
            category: None,
        }
    }

    /// Restrict to one word category
    pub fn with_category(mut self, category: Difficulty) -> Self {
        self.category = Some(category);
        self
    }
}

/// Prompt ready to be sent to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct PromptEnvelope {
    /// Task this prompt was built for
    pub task: Task,

    /// Task instructions
    pub instructions: String,

    /// Budgeted (possibly truncated) payload
    pub payload: String,
}

impl PromptEnvelope {
    /// Single user message content
    pub fn render(&self) -> String {
        if self.payload.is_empty() {
            return self.instructions.clone();
        }

        match self.task {
            Task::Summarize => format!("{}\n\n{}\n\nSummary:", self.instructions, self.payload),
            Task::Questions => format!(
                "{}\n\nText: {}\n\nQuestions (make sure each ends with a question mark):",
                self.instructions, self.payload
            ),
            Task::WordSets => format!("{}\n\nTheme: {}", self.instructions, self.payload),
        }
    }

    pub fn temperature(&self) -> f32 {
        self.task.temperature()
    }

    pub fn max_output_tokens(&self) -> usize {
        self.task.max_output_tokens()
    }
}

/// Raw provider reply
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    /// `choices[0].message.content`
    pub raw_reply_text: String,

    /// HTTP status of the reply
    pub http_status: u16,
}

/// Category → words mapping
pub type WordSets = BTreeMap<Difficulty, Vec<String>>;

/// Structurally valid result for a task
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedAnswer {
    Summary { summary_text: String },
    Questions(Vec<String>),
    WordSets(WordSets),
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model name
    pub model: String,

    /// Conversation, always a single user turn here
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Streaming is never used
    pub stream: bool,
}

/// Chat-completions response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,

    /// Some providers answer 200 with an error object
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
