use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use studyhelper_common::{LlmSettings, Result, StudyHelperError};
use tracing::{debug, info, warn};

use crate::llm_trait::ChatCompletion;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, CompletionResult, PromptEnvelope};

/// Longest slice of a provider body copied into error messages
const ERROR_EXCERPT_CHARS: usize = 300;

/// Chat-completions API client (OpenRouter compatible)
#[derive(Debug, Clone)]
pub struct ChatClient {
    url: String,
    model: String,
    client: Client,
}

impl ChatClient {
    /// Create new client
    ///
    /// Fails with a configuration error before any network traffic when the
    /// API key, model, or base URL is unusable.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                StudyHelperError::config("LLM API key is missing (set OPENROUTER_API_KEY)")
            })?;

        if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://") {
            return Err(StudyHelperError::config(
                "LLM base URL must start with http:// or https://",
            ));
        }

        if settings.model.trim().is_empty() {
            return Err(StudyHelperError::config("LLM model name cannot be empty"));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StudyHelperError::config("LLM API key contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(referer) = settings.http_referer.as_deref() {
            let value = HeaderValue::from_str(referer)
                .map_err(|_| StudyHelperError::config("LLM HTTP referer is not a valid header value"))?;
            headers.insert(HeaderName::from_static("http-referer"), value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let url = settings.completions_url();
        info!("Chat client initialized: {} (model: {})", url, settings.model);

        Ok(Self {
            url,
            model: settings.model.clone(),
            client,
        })
    }

    /// Send a single chat-completion request. No retries.
    pub async fn complete(&self, envelope: &PromptEnvelope) -> Result<CompletionResult> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(envelope.render())],
            temperature: envelope.temperature(),
            max_tokens: envelope.max_output_tokens(),
            stream: false,
        };

        debug!(
            "Sending chat completion - Task: {}, Model: {}, Prompt length: {}",
            envelope.task,
            request.model,
            request.messages[0].content.len()
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Chat completion transport failure: {}", e);
                StudyHelperError::gateway(None, format!("Failed to reach LLM provider: {}", e), "")
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            StudyHelperError::gateway(Some(status), format!("Failed to read response body: {}", e), "")
        })?;

        let result = parse_completion(status, &body);
        match &result {
            Ok(completion) => debug!(
                "Received chat completion - Status: {}, Length: {}",
                status,
                completion.raw_reply_text.len()
            ),
            Err(e) => warn!("LLM provider error: {} - body: {}", e, excerpt(&body)),
        }

        result
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(&self, envelope: &PromptEnvelope) -> Result<CompletionResult> {
        ChatClient::complete(self, envelope).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Turn a provider reply into a completion, or a gateway error carrying the body
pub fn parse_completion(status: u16, body: &str) -> Result<CompletionResult> {
    if !(200..300).contains(&status) {
        return Err(StudyHelperError::gateway(
            Some(status),
            format!("LLM provider returned HTTP {}: {}", status, excerpt(body)),
            body,
        ));
    }

    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        StudyHelperError::gateway(
            Some(status),
            format!("LLM provider returned an unreadable body: {}", e),
            body,
        )
    })?;

    if let Some(error) = parsed.error.filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(StudyHelperError::gateway(
            Some(status),
            format!("LLM provider error: {}", message),
            body,
        ));
    }

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            StudyHelperError::gateway(
                Some(status),
                "LLM provider response has no completion content",
                body,
            )
        })?;

    Ok(CompletionResult {
        raw_reply_text: content,
        http_status: status,
    })
}

fn excerpt(body: &str) -> String {
    let mut out: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
    if body.chars().count() > ERROR_EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}
