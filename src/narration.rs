//! Narration model abstraction.
//!
//! The chat pipeline only ever sees [`NarrationModel::generate`]: prompt in,
//! text out, fallible. [`gemini::GeminiModel`] talks to the Gemini REST API;
//! [`DisabledModel`] stands in when no API key is configured.

pub mod gemini;

pub use gemini::GeminiModel;

/// Failures of a narration model call. Never surfaced to users.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Model output was malformed: {0}")]
    Malformed(String),

    #[error("Failed to parse model response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Narration model is not configured")]
    Disabled,
}

/// Text generation collaborator.
#[async_trait::async_trait]
pub trait NarrationModel: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] on transport failure, quota/API errors, or an
    /// empty completion.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Model used when no credentials are available; every call fails so each
/// call site takes its deterministic fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledModel;

#[async_trait::async_trait]
impl NarrationModel for DisabledModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Disabled)
    }
}
