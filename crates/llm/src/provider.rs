//! The abstract completion transport (§4.8, §Glossary). No concrete HTTP
//! implementation ships here: callers inject a provider (a real OpenRouter
//! client in production, a scripted fake in tests).

use crate::error::LlmError;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// `Complete(prompt, [system]) -> text`.
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    /// Structured variant: provider is instructed (by prompt or API
    /// parameter) to return JSON matching `schema_hint`; still returns the
    /// raw text, parsing happens in [`crate::parse`].
    async fn complete_structured(
        &self,
        prompt: &str,
        system: Option<&str>,
        schema_hint: &str,
    ) -> Result<String, LlmError> {
        let _ = schema_hint;
        self.complete(prompt, system).await
    }
}
