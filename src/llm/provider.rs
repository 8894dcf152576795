use async_trait::async_trait;

use crate::core::errors::ApiError;

/// A hosted text model. The moderation pipeline and the chat agent only ever
/// see this trait, so both can run against an in-process fake in tests.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// single-turn text completion over a prompt of up to several KB
    async fn complete(&self, prompt: &str) -> Result<String, ApiError>;

    /// generate embeddings
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}
