use std::sync::Arc;
use studyhelper_common::{AppConfig, Result};
use studyhelper_llm::{ChatClient, ChatCompletion, PromptBuilder, StudyAidGenerator, TokenBudget};
use studyhelper_media::{TesseractOcr, TextRecognizer};

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Summary / question / word-set generator
    pub generator: StudyAidGenerator,

    /// OCR engine
    pub ocr: Arc<dyn TextRecognizer>,
}

impl AppState {
    /// Create new application state with the real backends
    ///
    /// Fails when the LLM gateway cannot be configured (e.g. missing API key).
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ChatClient::new(&config.llm)?;
        let ocr = TesseractOcr::from_config(&config);
        Ok(Self::with_backends(config, Arc::new(client), Arc::new(ocr)))
    }

    /// Create state around explicit backends
    pub fn with_backends(
        config: AppConfig,
        client: Arc<dyn ChatCompletion>,
        ocr: Arc<dyn TextRecognizer>,
    ) -> Self {
        let builder = PromptBuilder::new(TokenBudget::new(config.llm.context_tokens));

        Self {
            generator: StudyAidGenerator::new(client, builder),
            config,
            ocr,
        }
    }
}
