use crate::error::StudyHelperError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default OpenRouter-compatible endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Chat-completion provider settings
///
/// Built once at startup and handed to the gateway constructor.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Bearer token for the provider. `None` is rejected when the gateway is built.
    pub api_key: Option<String>,

    /// Model identifier (e.g. "deepseek/deepseek-chat")
    pub model: String,

    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Optional `HTTP-Referer` header (OpenRouter attribution)
    pub http_referer: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Model context window in tokens
    pub context_tokens: usize,
}

// Hand-written so the API key never ends up in logs
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("http_referer", &self.http_referer)
            .field("timeout_secs", &self.timeout_secs)
            .field("context_tokens", &self.context_tokens)
            .finish()
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "deepseek/deepseek-chat".to_string(),
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            http_referer: Some("http://localhost:8000".to_string()),
            timeout_secs: 120,
            context_tokens: 8192,
        }
    }
}

impl LlmSettings {
    /// Settings pointing at an arbitrary endpoint, mostly for tests
    pub fn with_endpoint(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full chat-completions URL
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM provider settings
    pub llm: LlmSettings,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Allowed CORS origins ("*" allows any)
    pub cors_origins: Vec<String>,

    /// Upper bound for multipart uploads
    pub max_upload_bytes: usize,

    /// Tesseract executable
    pub tesseract_cmd: String,

    /// Tesseract language pack
    pub ocr_lang: String,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: 10 * 1024 * 1024,
            tesseract_cmd: "tesseract".to_string(),
            ocr_lang: "eng".to_string(),
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, StudyHelperError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self::from_vars(|key| std::env::var(key).ok())?;

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, StudyHelperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm = LlmSettings {
            api_key: get("OPENROUTER_API_KEY").or_else(|| get("LLM_API_KEY")),
            model: get("OPENROUTER_MODEL")
                .or_else(|| get("LLM_MODEL"))
                .unwrap_or(defaults.llm.model),
            base_url: get("LLM_BASE_URL").unwrap_or(defaults.llm.base_url),
            http_referer: get("LLM_HTTP_REFERER").or(defaults.llm.http_referer),
            timeout_secs: parse_var(&get, "LLM_TIMEOUT_SECS", defaults.llm.timeout_secs)?,
            context_tokens: parse_var(&get, "MODEL_CONTEXT_TOKENS", defaults.llm.context_tokens)?,
        };

        Ok(Self {
            llm,
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var(&get, "SERVER_PORT", defaults.server_port)?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            max_upload_bytes: parse_var(&get, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            tesseract_cmd: get("TESSERACT_CMD").unwrap_or(defaults.tesseract_cmd),
            ocr_lang: get("OCR_LANG").unwrap_or(defaults.ocr_lang),
            log_dir: get("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), StudyHelperError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                StudyHelperError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    ///
    /// The API key is checked when the gateway is built.
    pub fn validate(&self) -> Result<(), StudyHelperError> {
        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://") {
            return Err(StudyHelperError::config(
                "LLM base URL must start with http:// or https://",
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(StudyHelperError::config("LLM model name cannot be empty"));
        }

        if self.llm.context_tokens < 1024 {
            return Err(StudyHelperError::config(
                "Model context window must be at least 1024 tokens",
            ));
        }

        if self.server_port == 0 {
            return Err(StudyHelperError::config("Server port cannot be 0"));
        }

        if self.max_upload_bytes == 0 {
            return Err(StudyHelperError::config("Upload limit cannot be 0"));
        }

        Ok(())
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> Result<T, StudyHelperError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            StudyHelperError::config(format!("{} has an invalid value: {}", key, raw))
        }),
        None => Ok(default),
    }
}
