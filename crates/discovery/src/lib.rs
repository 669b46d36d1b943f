//! URL Discoverer (C4): waterfall of increasingly expensive strategies to
//! find a company's careers/jobs page from its homepage.

pub mod platform;
pub mod sitemap;

use jobscout_core::patterns::matches_career_pattern;
use jobscout_http::HttpFetcher;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

pub use platform::{detect as detect_platform, find_external_board, normalize_board_url};
pub use sitemap::{extract_sitemap_directives, walk_sitemap, SitemapError};

/// Candidate paths tried when the sitemap and heuristic scan both fail
/// (§4.4 step 4). Ordered from most to least likely.
const ALTERNATIVE_PATHS: &[&str] = &[
    "careers", "career", "jobs", "job", "vacancies", "karriere", "stellenangebote",
    "stellen", "jobangebote", "offene-stellen", "arbeiten-bei-uns", "join-us",
    "work-with-us", "about/careers", "about/jobs", "company/careers",
    "en/careers", "en/jobs", "de/karriere", "de/jobs", "recruitment", "hiring",
    "careers/jobs", "jobs/search", "career/opportunities", "about-us/careers",
    "unternehmen/karriere", "karriere/stellenangebote", "vacancies/list",
    "open-positions", "positions",
];

pub struct UrlDiscoverer {
    fetcher: Arc<HttpFetcher>,
}

impl UrlDiscoverer {
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        Self { fetcher }
    }

    /// Step 1: probe `careers.<domain>` / `jobs.<domain>` subdomains.
    pub async fn probe_career_subdomain(&self, homepage: &str) -> Option<String> {
        let base = Url::parse(homepage).ok()?;
        let host = base.host_str()?;
        let bare_host = host.strip_prefix("www.").unwrap_or(host);

        for prefix in ["careers", "jobs", "karriere"] {
            let candidate = format!("{}://{prefix}.{bare_host}", base.scheme());
            if self.fetcher.probe_domain(&candidate).await.unwrap_or(false) {
                return Some(candidate);
            }
        }
        None
    }

    /// Step 2: robots.txt -> sitemap.xml walk, prioritized by career shape.
    pub async fn try_sitemap(&self, homepage: &str) -> Option<String> {
        let base = Url::parse(homepage).ok()?;
        let robots_url = base.join("/robots.txt").ok()?;
        let robots_body = self.fetcher.get(robots_url.as_str()).await.ok().flatten()?.body;

        let mut sitemap_urls = extract_sitemap_directives(&robots_body);
        if sitemap_urls.is_empty() {
            sitemap_urls.push(base.join("/sitemap.xml").ok()?.to_string());
        }

        for sitemap_url in sitemap_urls {
            if let Ok(urls) = walk_sitemap(&self.fetcher, &sitemap_url).await {
                if let Some(best) = urls.into_iter().find(|u| matches_career_pattern(u)) {
                    return Some(best);
                }
            }
        }
        None
    }

    /// Step 3: scan the homepage's rendered HTML for a careers-shaped link.
    pub fn scan_homepage_heuristic(&self, homepage: &str, html: &str) -> Option<String> {
        let base = Url::parse(homepage).ok()?;
        let document = Html::parse_document(html);
        let selector = Selector::parse("a[href]").ok()?;

        let mut best: Option<(u8, String)> = None;
        for el in document.select(&selector) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            let text = el.text().collect::<String>();
            if !matches_career_pattern(href) && !matches_career_pattern(&text) {
                continue;
            }
            let Ok(resolved) = base.join(href) else {
                continue;
            };
            let score = if matches_career_pattern(href) { 2 } else { 1 };
            if best.as_ref().map(|(s, _)| score > *s).unwrap_or(true) {
                best = Some((score, resolved.to_string()));
            }
        }
        best.map(|(_, url)| url)
    }

    /// Step 4: brute-force a fixed list of commonly used careers paths.
    pub async fn brute_force_alternatives(&self, homepage: &str) -> Option<String> {
        let base = Url::parse(homepage).ok()?;
        for path in ALTERNATIVE_PATHS {
            let Ok(candidate) = base.join(path) else {
                continue;
            };
            if let Ok(Some(resp)) = self.fetcher.get(candidate.as_str()).await {
                if (200..300).contains(&resp.status) {
                    return Some(candidate.to_string());
                }
            }
        }
        None
    }

    /// Generate plausible careers-URL variants for a bare domain, used to
    /// seed the LLM fallback prompt when every other strategy is exhausted.
    pub fn generate_url_variants(&self, homepage: &str) -> Vec<String> {
        let Ok(base) = Url::parse(homepage) else {
            return Vec::new();
        };
        ALTERNATIVE_PATHS
            .iter()
            .filter_map(|p| base.join(p).ok())
            .map(|u| u.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_homepage_heuristic_prefers_href_match_over_text_only() {
        let discoverer = UrlDiscoverer {
            fetcher: Arc::new(HttpFetcher::new(Arc::new(jobscout_ratelimit::RateLimiter::new(
                Default::default(),
            )))),
        };
        let html = r#"<html><body>
            <a href="/about">Learn about our mission and careers</a>
            <a href="/careers">Jobs</a>
        </body></html>"#;
        let found = discoverer
            .scan_homepage_heuristic("https://acme.com", html)
            .unwrap();
        assert_eq!(found, "https://acme.com/careers");
    }

    #[test]
    fn generates_career_url_variants() {
        let discoverer = UrlDiscoverer {
            fetcher: Arc::new(HttpFetcher::new(Arc::new(jobscout_ratelimit::RateLimiter::new(
                Default::default(),
            )))),
        };
        let variants = discoverer.generate_url_variants("https://acme.com");
        assert!(variants.contains(&"https://acme.com/careers".to_string()));
        assert!(variants.contains(&"https://acme.com/karriere".to_string()));
    }
}
