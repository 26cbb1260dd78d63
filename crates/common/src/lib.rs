pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use config::{AppConfig, LlmSettings};
pub use error::StudyHelperError;
pub type Result<T> = std::result::Result<T, StudyHelperError>;
