use async_trait::async_trait;
use studyhelper_common::Result;

use crate::types::{CompletionResult, PromptEnvelope};

/// Common trait for chat-completion backends
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send one prompt, get one completion back. Implementations never retry.
    async fn complete(&self, envelope: &PromptEnvelope) -> Result<CompletionResult>;

    /// Model identifier used for requests
    fn model(&self) -> &str;
}
