//! Pagination loop (§4.10): a restartable sequence of pages terminated by
//! whichever of three disjoint conditions comes first (§9 "Generators").

use crate::dispatch::extract_structured;
use crate::llm_extract::extract_via_llm;
use jobscout_core::normalize::{dedup_key, is_self_referencing_url};
use jobscout_core::JobCandidate;
use jobscout_http::HttpFetcher;
use jobscout_llm::{CompletionProvider, LlmCache, LlmCacheStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

pub const MAX_PAGINATION_PAGES: usize = 10;

/// Runs the per-page `(Schema.org, PDF, LLM)` tiers in a dedup-and-advance
/// loop starting from `(careers_url, first_page_html)`.
pub async fn paginate<S: LlmCacheStore>(
    cache: &LlmCache<S>,
    provider: &Arc<dyn CompletionProvider>,
    fetcher: &HttpFetcher,
    careers_url: &str,
    first_page_html: &str,
    max_pages: usize,
) -> anyhow::Result<Vec<JobCandidate>> {
    let mut jobs = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_keys: HashSet<(String, String)> = HashSet::new();

    let mut current_url = careers_url.to_string();
    let mut current_html = Some(first_page_html.to_string());

    for page in 0..max_pages {
        let html = match current_html.take() {
            Some(h) => h,
            None => match fetcher.get(&current_url).await {
                Ok(Some(resp)) => resp.body,
                _ => break,
            },
        };

        let mut page_jobs = extract_structured(&html, &current_url);
        let mut next_page_url = None;
        if page_jobs.is_empty() {
            let (llm_jobs, next) = extract_via_llm(cache, provider, &current_url, &html).await?;
            page_jobs = llm_jobs;
            next_page_url = next;
        }

        let mut added_this_page = 0usize;
        for candidate in page_jobs {
            let is_new = match candidate.url.as_deref() {
                Some(url) if !is_self_referencing_url(url, &current_url) => seen_urls.insert(url.to_string()),
                _ => {
                    let key = dedup_key(&candidate.title, candidate.location.as_deref());
                    seen_keys.insert(key)
                }
            };
            if is_new {
                added_this_page += 1;
                jobs.push(candidate);
            }
        }

        if added_this_page == 0 && page > 0 {
            break;
        }

        match next_page_url {
            Some(next) if page + 1 < max_pages => {
                current_url = next;
            }
            Some(next) => {
                warn!(next_page_url = %next, "pagination cap reached with more pages available");
                break;
            }
            None => break,
        }
    }

    Ok(jobs)
}
