//! Prompt templates for study aids

use studyhelper_common::{Result, StudyHelperError};
use tracing::debug;

use crate::tokens::{count_tokens, truncate, TokenBudget, TRUNCATION_MARKER};
use crate::types::{Difficulty, PromptEnvelope, Task};

/// Summary instructions
pub const SUMMARY_PROMPT: &str = "You are a helpful AI assistant. Please provide a clear and concise summary of the following text.";

/// Question instructions
pub const QUESTIONS_PROMPT: &str = "You are a helpful AI assistant. Generate exactly 5 study questions based on this text. \
Questions should test understanding and critical thinking, not just recall. \
Do not number the questions, just list them with each on a new line, and end every question with a question mark.";

/// Word list instructions for all three categories
pub fn word_sets_prompt(category: Option<Difficulty>) -> String {
    match category {
        None => r#"Generate a JSON object with three arrays of English words categorized by difficulty:
{
    "easy": [10 common English words],
    "medium": [10 intermediate English words],
    "hard": [10 advanced English words]
}
Make sure each array has exactly 10 words. Words should be appropriate for language learning.
Respond with the JSON object only."#
            .to_string(),
        Some(category) => format!(
            r#"Generate a JSON object with an array of 10 English words for {name} difficulty level:
{{
    "{name}": [10 {describe} English words]
}}
Make sure the array has exactly 10 words. Words should be appropriate for language learning.
Respond with the JSON object only."#,
            name = category.as_str(),
            describe = category.describe()
        ),
    }
}

/// Builds task prompts within the token budget
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder {
    budget: TokenBudget,
}

impl PromptBuilder {
    pub fn new(budget: TokenBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// Build a prompt from a task name, rejecting unknown tasks
    pub fn build_from_str(
        &self,
        task: &str,
        text: &str,
        category: Option<Difficulty>,
    ) -> Result<PromptEnvelope> {
        self.build(task.parse()?, text, category)
    }

    /// Build the prompt for `task`, truncating `text` to fit the context window
    pub fn build(&self, task: Task, text: &str, category: Option<Difficulty>) -> Result<PromptEnvelope> {
        let text = text.trim();

        let instructions = match task {
            Task::Summarize | Task::Questions if text.is_empty() => {
                return Err(StudyHelperError::validation("Text must not be empty"));
            }
            Task::Summarize => SUMMARY_PROMPT.to_string(),
            Task::Questions => QUESTIONS_PROMPT.to_string(),
            Task::WordSets => word_sets_prompt(category),
        };

        // Template text around the payload counts against the budget too
        let mut envelope = PromptEnvelope {
            task,
            instructions,
            payload: "x".to_string(),
        };
        let frame_tokens = count_tokens(&envelope.render());
        let payload_budget = self
            .budget
            .prompt_limit(task.max_output_tokens())
            .saturating_sub(frame_tokens)
            .saturating_sub(count_tokens(TRUNCATION_MARKER));

        envelope.payload = truncate(text, payload_budget);
        if envelope.payload != text {
            debug!(
                "Prompt payload truncated for {}: {} -> {} tokens",
                task,
                count_tokens(text),
                count_tokens(&envelope.payload)
            );
        }

        Ok(envelope)
    }
}
