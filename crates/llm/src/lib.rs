//! StudyHelper LLM Integration
//!
//! Chat-completions client, prompt budgeting and reply normalization

mod analysis;
mod client;
mod generator;
mod llm_trait;
mod normalize;
mod prompts;
mod tokens;
mod types;

pub use analysis::{
    clean_input_text, detect_note_type, extract_foreign_terms, extract_key_terms, NoteType,
    MAX_KEY_TERMS,
};
pub use client::{parse_completion, ChatClient};
pub use generator::StudyAidGenerator;
pub use llm_trait::ChatCompletion;
pub use normalize::{
    default_words, normalize_questions, normalize_word_sets, FILLER_QUESTION, QUESTION_COUNT,
    WORDS_PER_CATEGORY,
};
pub use prompts::{word_sets_prompt, PromptBuilder, QUESTIONS_PROMPT, SUMMARY_PROMPT};
pub use tokens::{count_tokens, truncate, TokenBudget, TRUNCATION_MARKER};
pub use types::{
    CompletionResult, Difficulty, GenerationRequest, NormalizedAnswer, PromptEnvelope, Task,
    WordSets,
};
