use async_trait::async_trait;

/// Trait for LLM providers. Each backend implements this.
///
/// The whole turn (persona, cookbooks, history and the new message) arrives
/// as one flattened prompt sent as a single user message.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a generation request and return the model's response text.
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}
