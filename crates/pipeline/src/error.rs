//! Top-level error taxonomy (§7), one variant per row of the error table.
//! Lower-crate errors are reclassified into it rather than blanket-wrapped,
//! so the DomainUnreachable/LlmFatal/PlatformMissing bubble-up policy can
//! still match on kind at this boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("domain unreachable: {0}")]
    DomainUnreachable(String),
    #[error("transient fetch failure: {0}")]
    FetchTransient(String),
    #[error("rate limited: {0}")]
    FetchRateLimited(String),
    #[error("extraction returned no jobs: {0}")]
    ParseEmpty(String),
    #[error("extraction failed to parse: {0}")]
    ParseInvalid(String),
    #[error("cached career url looks stale: {0}")]
    CacheStale(String),
    #[error("llm call failed fatally: {0}")]
    LlmFatal(String),
    #[error("browser platform not installed: {0}")]
    PlatformMissing(String),
    #[error(transparent)]
    Storage(#[from] jobscout_storage::StorageError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<jobscout_http::FetchError> for PipelineError {
    fn from(err: jobscout_http::FetchError) -> Self {
        match err {
            jobscout_http::FetchError::DomainUnreachable(m) => PipelineError::DomainUnreachable(m),
            jobscout_http::FetchError::Transient(m) => PipelineError::FetchTransient(m),
            jobscout_http::FetchError::Other(e) => PipelineError::Other(e),
        }
    }
}

impl From<jobscout_browser::BrowserError> for PipelineError {
    fn from(err: jobscout_browser::BrowserError) -> Self {
        match err {
            jobscout_browser::BrowserError::DomainUnreachable(m) => PipelineError::DomainUnreachable(m),
            jobscout_browser::BrowserError::Other(e) => PipelineError::Other(e),
        }
    }
}

impl From<jobscout_llm::LlmError> for PipelineError {
    fn from(err: jobscout_llm::LlmError) -> Self {
        match err {
            jobscout_llm::LlmError::Retryable(m) => PipelineError::FetchTransient(m),
            jobscout_llm::LlmError::Fatal(m) => PipelineError::LlmFatal(m),
            jobscout_llm::LlmError::Other(e) => PipelineError::Other(e),
        }
    }
}
