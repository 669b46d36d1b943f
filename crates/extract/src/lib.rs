//! Structured Extractors (C7), LLM extraction (part of C8), and the
//! Hybrid Extractor + pagination loop (C10).

pub mod dispatch;
pub mod hybrid;
pub mod llm_extract;
pub mod pagination;

pub use hybrid::HybridExtractor;
pub use pagination::MAX_PAGINATION_PAGES;
