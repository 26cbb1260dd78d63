use std::sync::Arc;

use studyhelper_common::{Result, StudyHelperError};
use tracing::{debug, info};

use crate::llm_trait::ChatCompletion;
use crate::normalize::{normalize_questions, normalize_word_sets};
use crate::prompts::PromptBuilder;
use crate::types::{Difficulty, GenerationRequest, NormalizedAnswer, Task, WordSets};

/// Study aid generator: prompt → completion → normalized answer
#[derive(Clone)]
pub struct StudyAidGenerator {
    client: Arc<dyn ChatCompletion>,
    builder: PromptBuilder,
}

impl StudyAidGenerator {
    /// Create new generator
    pub fn new(client: Arc<dyn ChatCompletion>, builder: PromptBuilder) -> Self {
        Self { client, builder }
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Summarize text
    pub async fn generate_summary(&self, text: &str) -> Result<String> {
        info!("Generating summary - Text length: {} chars", text.len());

        let envelope = self.builder.build(Task::Summarize, text, None)?;
        let completion = self.client.complete(&envelope).await?;
        let summary = clean_summary(&completion.raw_reply_text);
        if summary.is_empty() {
            return Err(StudyHelperError::gateway(
                Some(completion.http_status),
                "LLM provider returned no usable completion",
                completion.raw_reply_text,
            ));
        }

        debug!("Summary generated - Length: {} chars", summary.len());
        Ok(summary)
    }

    /// Exactly five study questions
    pub async fn generate_questions(&self, text: &str) -> Result<Vec<String>> {
        info!("Generating questions - Text length: {} chars", text.len());

        let envelope = self.builder.build(Task::Questions, text, None)?;
        let completion = self.client.complete(&envelope).await?;
        let questions = normalize_questions(&completion.raw_reply_text);

        debug!("Questions generated: {:?}", questions);
        Ok(questions)
    }

    /// Ten words per requested category, all three when `category` is `None`
    pub async fn generate_word_sets(
        &self,
        category: Option<Difficulty>,
        theme: Option<&str>,
    ) -> Result<WordSets> {
        info!(
            "Generating word sets - Category: {}",
            category.map(|c| c.as_str()).unwrap_or("all")
        );

        let envelope = self
            .builder
            .build(Task::WordSets, theme.unwrap_or_default(), category)?;
        let completion = self.client.complete(&envelope).await?;

        let categories: Vec<Difficulty> = match category {
            Some(category) => vec![category],
            None => Difficulty::ALL.to_vec(),
        };
        let sets = normalize_word_sets(&completion.raw_reply_text, &categories);

        debug!("Word sets generated: {:?}", sets);
        Ok(sets)
    }

    /// Run any task
    pub async fn generate(&self, request: &GenerationRequest) -> Result<NormalizedAnswer> {
        match request.task {
            Task::Summarize => Ok(NormalizedAnswer::Summary {
                summary_text: self.generate_summary(&request.raw_text).await?,
            }),
            Task::Questions => Ok(NormalizedAnswer::Questions(
                self.generate_questions(&request.raw_text).await?,
            )),
            Task::WordSets => {
                let theme = Some(request.raw_text.trim()).filter(|t| !t.is_empty());
                Ok(NormalizedAnswer::WordSets(
                    self.generate_word_sets(request.category, theme).await?,
                ))
            }
        }
    }
}

/// Trim and drop an echoed "Summary:" label
fn clean_summary(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_label = match trimmed.get(..8) {
        Some(prefix) if prefix.eq_ignore_ascii_case("summary:") => &trimmed[8..],
        _ => trimmed,
    };
    without_label.trim().to_string()
}
