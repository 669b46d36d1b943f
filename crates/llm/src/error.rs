use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// 5xx / rate-limit / timeout shaped failures; worth retrying (§4.8, §7).
    #[error("retryable LLM error: {0}")]
    Retryable(String),
    /// Everything else from the provider; bubbles up and fails the site scan.
    #[error("fatal LLM error: {0}")]
    Fatal(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

const RETRYABLE_PATTERNS: &[&str] = &["rate limit", "overloaded", "service unavailable", "502", "503", "504"];

pub fn classify_message(message: &str) -> LlmError {
    let lower = message.to_lowercase();
    if RETRYABLE_PATTERNS.iter().any(|p| lower.contains(p)) {
        LlmError::Retryable(message.to_string())
    } else {
        LlmError::Fatal(message.to_string())
    }
}
