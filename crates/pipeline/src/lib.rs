//! Site Pipeline (C13): the top-level `Scan(input_url)` orchestration.

pub mod error;
pub mod filters;
pub mod llm_tasks;

pub use error::PipelineError;

use jobscout_browser::BrowserFetcher;
use jobscout_core::{normalize::dedup_key, Job, JobCandidate, SyncResult};
use jobscout_discovery::{detect_platform, find_external_board, UrlDiscoverer};
use jobscout_extract::HybridExtractor;
use jobscout_http::{registrable_domain, HttpFetcher};
use jobscout_llm::{CompletionProvider, LlmCache, LlmCacheStore};
use jobscout_storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A site previously cached as suspicious is treated as stale rather than
/// trusted (§4.12 "Suspicion heuristic").
const STALE_CACHE_THRESHOLD: i64 = 5;

pub struct SitePipeline<S: LlmCacheStore> {
    fetcher: Arc<HttpFetcher>,
    browser: Option<Arc<BrowserFetcher>>,
    discoverer: UrlDiscoverer,
    extractor: HybridExtractor<S>,
    cache: Arc<LlmCache<S>>,
    provider: Arc<dyn CompletionProvider>,
    storage: Arc<Storage>,
}

/// Outcome of one `scan` call, the shape the CLI/status surface renders.
pub struct ScanOutcome {
    pub site_domain: String,
    pub career_url: Option<String>,
    pub jobs: Vec<Job>,
    pub sync: SyncResult,
}

impl<S: LlmCacheStore> SitePipeline<S> {
    pub fn new(
        fetcher: Arc<HttpFetcher>,
        browser: Option<Arc<BrowserFetcher>>,
        cache: Arc<LlmCache<S>>,
        provider: Arc<dyn CompletionProvider>,
        storage: Arc<Storage>,
        max_pagination_pages: usize,
    ) -> Self {
        let discoverer = UrlDiscoverer::new(fetcher.clone());
        let extractor = HybridExtractor::new(cache.clone(), provider.clone(), fetcher.clone())
            .with_max_pagination_pages(max_pagination_pages);
        Self {
            fetcher,
            browser,
            discoverer,
            extractor,
            cache,
            provider,
            storage,
        }
    }

    pub async fn scan(&self, input_url: &str) -> Result<ScanOutcome, PipelineError> {
        let normalized = normalize_input_url(input_url);
        let site_domain = bare_domain(&normalized);

        if !self.fetcher.probe_domain(&normalized).await? {
            return Err(PipelineError::DomainUnreachable(site_domain));
        }

        let site = self.storage.get_or_create_site(&site_domain).await?;
        let previous_jobs = self.storage.previous_job_count(site.id).await?;

        let cached = self.scan_cached_urls(site.id, &site_domain, previous_jobs).await?;

        let (career_url, jobs) = match cached {
            Some(result) => result,
            None => self.scan_via_discovery(&normalized, &site_domain).await?,
        };
        let jobs = dedup_candidates(jobs);

        let sync = self.storage.sync_jobs(site.id, &jobs).await?;
        self.storage.touch_last_scanned(site.id).await?;

        self.enrich(&site_domain, site.id, &normalized, &sync).await;

        Ok(ScanOutcome {
            site_domain,
            career_url,
            jobs: self.storage.get_active_jobs(site.id).await?,
            sync,
        })
    }

    /// Step 3: try every cached career URL before paying for discovery.
    async fn scan_cached_urls(
        &self,
        site_id: i64,
        site_domain: &str,
        previous_jobs: i64,
    ) -> Result<Option<(Option<String>, Vec<JobCandidate>)>, PipelineError> {
        let career_urls = self.storage.active_career_urls(site_id).await?;

        for career_url in career_urls {
            let Ok(Some(resp)) = self.fetcher.get(&career_url.url).await else {
                self.storage.mark_url_failed(career_url.id, jobscout_core::CareerUrl::MAX_FAILURES).await?;
                continue;
            };

            let jobs = match self
                .extractor
                .extract(&career_url.url, &resp.body, career_url.platform.as_deref())
                .await
            {
                Ok(jobs) => jobs,
                Err(e) => {
                    warn!(url = %career_url.url, error = %e, "cached url extraction failed");
                    self.storage.mark_url_failed(career_url.id, jobscout_core::CareerUrl::MAX_FAILURES).await?;
                    continue;
                }
            };

            if jobs.is_empty() && previous_jobs > STALE_CACHE_THRESHOLD {
                debug!(url = %career_url.url, previous_jobs, "cached url returned zero jobs against an established site, treating as stale");
                self.storage.mark_url_failed(career_url.id, jobscout_core::CareerUrl::MAX_FAILURES).await?;
                continue;
            }

            self.storage.mark_url_success(career_url.id).await?;

            let board_domain = registrable_domain(&career_url.url);
            let jobs = if board_domain != registrable_domain(site_domain) {
                filters::filter_by_source_company(jobs, site_domain)
            } else {
                jobs
            };

            return Ok(Some((Some(career_url.url), jobs)));
        }

        Ok(None)
    }

    /// Step 4: full discovery waterfall when no cached URL produced jobs.
    async fn scan_via_discovery(
        &self,
        homepage: &str,
        site_domain: &str,
    ) -> Result<(Option<String>, Vec<JobCandidate>), PipelineError> {
        let (career_url, html, platform) = self.discover_career_page(homepage).await?;

        let Some(career_url) = career_url else {
            info!(site_domain, "no career page discovered");
            return Ok((None, Vec::new()));
        };

        let jobs = self.extractor.extract(&career_url, &html, platform.as_deref()).await?;

        let final_registrable = registrable_domain(&career_url);
        let home_registrable = registrable_domain(site_domain);
        let jobs = if final_registrable != home_registrable {
            filters::filter_by_source_company(jobs, site_domain)
        } else {
            jobs
        };
        let jobs = filters::filter_by_query_param(jobs, &career_url);

        let site = self.storage.get_site_by_domain(site_domain).await?;
        if let Some(site) = site {
            self.storage
                .add_career_url(site.id, &strip_query(&career_url), platform.as_deref())
                .await?;
        }

        Ok((Some(career_url), jobs))
    }

    /// Subdomain probe -> sitemap walk -> homepage heuristic -> brute
    /// force -> browser-driven click-through, in that order (§4.4/§4.13).
    async fn discover_career_page(
        &self,
        homepage: &str,
    ) -> Result<(Option<String>, String, Option<String>), PipelineError> {
        if let Some(url) = self.discoverer.probe_career_subdomain(homepage).await {
            if let Some(html) = self.fetch_body(&url).await {
                let platform = self.detect_platform_for(&url, &html);
                return Ok((Some(url), html, platform));
            }
        }

        if let Some(url) = self.discoverer.try_sitemap(homepage).await {
            if let Some(html) = self.fetch_body(&url).await {
                let platform = self.detect_platform_for(&url, &html);
                return Ok((Some(url), html, platform));
            }
        }

        if let Some(homepage_html) = self.fetch_body(homepage).await {
            if let Some(url) = self.discoverer.scan_homepage_heuristic(homepage, &homepage_html) {
                if let Some(html) = self.fetch_body(&url).await {
                    let platform = self.detect_platform_for(&url, &html);
                    return Ok((Some(url), html, platform));
                }
            }
        }

        if let Some(url) = self.discoverer.brute_force_alternatives(homepage).await {
            if let Some(html) = self.fetch_body(&url).await {
                let platform = self.detect_platform_for(&url, &html);
                return Ok((Some(url), html, platform));
            }
        }

        if let Some(browser) = &self.browser {
            match browser.fetch_with_navigation(homepage, 1).await {
                Ok(result) if result.final_url != homepage => {
                    let platform = self.detect_platform_for(&result.final_url, &result.html);
                    return Ok((Some(result.final_url), result.html, platform));
                }
                Ok(_) => {}
                Err(e) => warn!(homepage, error = %e, "browser discovery failed"),
            }
        }

        Ok((None, String::new(), None))
    }

    fn detect_platform_for(&self, url: &str, html: &str) -> Option<String> {
        detect_platform(url, Some(html))
            .map(str::to_string)
            .or_else(|| find_external_board(html).and_then(|board| detect_platform(&board, None)).map(str::to_string))
    }

    async fn fetch_body(&self, url: &str) -> Option<String> {
        self.fetcher.get(url).await.ok().flatten().map(|r| r.body)
    }

    /// Step 5: translate titles and backfill a missing company description,
    /// both fire-and-forget relative to the scan result already returned.
    async fn enrich(&self, site_domain: &str, site_id: i64, homepage: &str, sync: &SyncResult) {
        let mut newly_changed: Vec<Job> = Vec::new();
        newly_changed.extend(sync.new_jobs.iter().cloned());
        newly_changed.extend(sync.reactivated_jobs.iter().cloned());

        let translate = llm_tasks::translate_titles(&self.cache, &self.provider, &newly_changed);
        let company_info = async {
            let site = self.storage.get_site_by_domain(site_domain).await.ok().flatten();
            if site.as_ref().and_then(|s| s.description.as_ref()).is_some() {
                return None;
            }
            let homepage_html = self.fetch_body(homepage).await?;
            llm_tasks::extract_company_info(&self.cache, &self.provider, homepage, &homepage_html).await
        };

        let (translations, description) = tokio::join!(translate, company_info);

        for (job_id, title_en) in translations {
            if let Err(e) = self.storage.set_title_en(job_id, &title_en).await {
                warn!(job_id, error = %e, "failed to persist translated title");
            }
        }
        if let Some(description) = description {
            if let Err(e) = self.storage.set_site_description(site_id, &description).await {
                warn!(error = %e, "failed to persist company description");
            }
        }
    }
}

fn normalize_input_url(input: &str) -> String {
    if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

fn bare_domain(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return url.to_string();
    };
    let host = parsed.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

fn strip_query(url: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_string();
    };
    parsed.set_query(None);
    parsed.to_string()
}

/// Deduplicates a list of candidates against itself, by URL first (unless
/// self-referencing) then by normalized `(title, location)` (§4.10 step 2).
pub fn dedup_candidates(jobs: Vec<JobCandidate>) -> Vec<JobCandidate> {
    let mut seen_urls = std::collections::HashSet::new();
    let mut seen_keys = std::collections::HashSet::new();
    jobs.into_iter()
        .filter(|job| match job.url.as_deref() {
            Some(url) if !url.is_empty() && url != "#" => seen_urls.insert(url.to_string()),
            _ => seen_keys.insert(dedup_key(&job.title, job.location.as_deref())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_schemeless_input() {
        assert_eq!(normalize_input_url("acme.com"), "https://acme.com");
        assert_eq!(normalize_input_url("http://acme.com"), "http://acme.com");
    }

    #[test]
    fn bare_domain_strips_www_only() {
        assert_eq!(bare_domain("https://www.8com.de/offene-stellen"), "8com.de");
        assert_eq!(bare_domain("https://karriere.synqony.com/search"), "karriere.synqony.com");
    }
}
