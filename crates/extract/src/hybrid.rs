//! Hybrid Extractor (C10): platform dispatch plus the pagination loop for
//! sites without a known ATS (§4.10).

use crate::pagination::{paginate, MAX_PAGINATION_PAGES};
use jobscout_core::JobCandidate;
use jobscout_http::HttpFetcher;
use jobscout_llm::{CompletionProvider, LlmCache, LlmCacheStore};
use std::sync::Arc;

/// Platforms with a dedicated ATS parser (§4.6 registry). A detected
/// platform outside this set is treated as unknown — the caller falls
/// through to the generic Schema.org/PDF/LLM tiers.
const KNOWN_PLATFORMS: &[&str] = &[
    "greenhouse", "lever", "workable", "personio", "recruitee", "hibob", "hrworks", "deloitte",
];

pub struct HybridExtractor<S: LlmCacheStore> {
    cache: Arc<LlmCache<S>>,
    provider: Arc<dyn CompletionProvider>,
    fetcher: Arc<HttpFetcher>,
    max_pagination_pages: usize,
}

impl<S: LlmCacheStore> HybridExtractor<S> {
    pub fn new(cache: Arc<LlmCache<S>>, provider: Arc<dyn CompletionProvider>, fetcher: Arc<HttpFetcher>) -> Self {
        Self {
            cache,
            provider,
            fetcher,
            max_pagination_pages: MAX_PAGINATION_PAGES,
        }
    }

    pub fn with_max_pagination_pages(mut self, max_pages: usize) -> Self {
        self.max_pagination_pages = max_pages;
        self
    }

    /// Extracts jobs starting from an already-fetched `careers_url` page.
    /// A known ATS platform returns its full listing directly and never
    /// enters the pagination loop (§4.10: "ATS parsers bypass the
    /// pagination loop"); otherwise the loop runs Schema.org/PDF/LLM per
    /// page until one of its three termination conditions is hit.
    pub async fn extract(
        &self,
        careers_url: &str,
        html: &str,
        platform: Option<&str>,
    ) -> anyhow::Result<Vec<JobCandidate>> {
        if let Some(platform) = platform {
            if platform == "recruitee" {
                if let Some(jobs) = self.fetch_recruitee_via_api(careers_url).await {
                    return Ok(jobscout_ats::filter_non_job_candidates(jobs));
                }
            }
            if KNOWN_PLATFORMS.contains(&platform) {
                let jobs = jobscout_ats::parse_by_platform(platform, html, careers_url);
                return Ok(jobscout_ats::filter_non_job_candidates(jobs));
            }
        }

        let jobs = paginate(
            &self.cache,
            &self.provider,
            &self.fetcher,
            careers_url,
            html,
            self.max_pagination_pages,
        )
        .await?;
        Ok(jobscout_ats::filter_non_job_candidates(jobs))
    }

    /// Recruitee flags as API-based (§4.10 i): jobs normally load client-side
    /// from `/api/offers`, so hit that directly instead of trusting whatever
    /// got server-rendered into `html`. Returns `None` on any fetch/parse
    /// miss so the caller falls back to the HTML parser.
    async fn fetch_recruitee_via_api(&self, careers_url: &str) -> Option<Vec<JobCandidate>> {
        let api_url = jobscout_ats::recruitee::api_offers_url(careers_url)?;
        let response = self.fetcher.get(&api_url).await.ok()??;
        let jobs = jobscout_ats::recruitee::parse_api_response(&response.body, careers_url);
        if jobs.is_empty() {
            return None;
        }
        Some(jobs)
    }
}
