//! Browser Fetcher (C3): headless-browser page loads, cookie-consent
//! dismissal, SPA scrolling, iframe/external-board follow-through.

use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use jobscout_core::patterns::{detect_platform_from_url, matches_career_pattern, matches_cookie_accept};
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser error whose message contains a network-unreachable token
    /// (§4.3 Error mapping).
    #[error("domain unreachable: {0}")]
    DomainUnreachable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub navigation_timeout: Duration,
    pub max_scroll_iterations: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            max_scroll_iterations: 8,
        }
    }
}

const SETTLE_DELAY: Duration = Duration::from_millis(1500);
const SELECTOR_WAIT: Duration = Duration::from_secs(5);
const COOKIE_POLL_COUNT: u32 = 3;
const COOKIE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const POST_CLICK_SETTLE: Duration = Duration::from_millis(2500);
const NEW_TAB_WAIT: Duration = Duration::from_millis(600);
const SPA_GROWTH_RATIO: f64 = 0.20;

/// Jobs-page href/text patterns the navigation heuristic looks for (§4.3).
fn is_jobs_link_candidate(href: &str, text: &str) -> bool {
    let href_lower = href.to_lowercase();
    let jobs_href = href_lower.contains("/jobs")
        || href_lower.contains("/careers")
        || href_lower.contains("/stellenangebote")
        || href_lower.contains("karriere.");
    let is_excluded = href_lower.contains("stellenprofil")
        || href_lower.contains("/job/")
        || href_lower.contains("#apply");
    if is_excluded {
        return false;
    }
    jobs_href || matches_career_pattern(text)
}

/// Wraps a headless browser with clean per-page context (no shared cookies).
pub struct BrowserFetcher {
    browser: Browser,
    config: BrowserConfig,
}

impl BrowserFetcher {
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        let mut builder = LaunchOptionsBuilder::default();
        builder.headless(config.headless);
        builder.args(vec![
            std::ffi::OsStr::new("--no-sandbox"),
            std::ffi::OsStr::new("--disable-dev-shm-usage"),
            std::ffi::OsStr::new("--disable-gpu"),
        ]);
        if let Ok(path) = std::env::var("CHROME_PATH") {
            builder.path(Some(path.into()));
        }
        let options = builder
            .build()
            .map_err(|e| BrowserError::Other(anyhow::anyhow!(e)))?;
        let browser = Browser::new(options).map_err(|e| classify_launch_error(e))?;
        Ok(Self { browser, config })
    }

    /// Load with `domcontentloaded`, optionally await a selector, then a
    /// fixed settle delay; return rendered HTML (§4.3).
    pub async fn fetch_simple(
        &self,
        url: &str,
        wait_for_selector: Option<&str>,
    ) -> Result<String, BrowserError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| classify_launch_error(e))?;
        let result = self.fetch_simple_on_tab(&tab, url, wait_for_selector).await;
        let _ = tab.close(true);
        result
    }

    async fn fetch_simple_on_tab(
        &self,
        tab: &Arc<Tab>,
        url: &str,
        wait_for_selector: Option<&str>,
    ) -> Result<String, BrowserError> {
        tab.navigate_to(url).map_err(classify_nav_error)?;
        tab.wait_until_navigated().map_err(classify_nav_error)?;

        if let Some(selector) = wait_for_selector {
            let _ = tab.wait_for_element_with_custom_timeout(selector, SELECTOR_WAIT);
        }
        tokio::time::sleep(SETTLE_DELAY).await;

        tab.get_content().map_err(|e| BrowserError::Other(e))
    }

    /// Load, handle cookie consent, attempt to click through to an embedded
    /// jobs listing, and follow into external ATS if discovered (§4.3).
    pub async fn fetch_with_navigation(
        &self,
        url: &str,
        max_attempts: u32,
    ) -> Result<NavigationResult, BrowserError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| classify_launch_error(e))?;
        let result = self.navigate_inner(&tab, url, max_attempts).await;
        let _ = tab.close(true);
        result
    }

    async fn navigate_inner(
        &self,
        tab: &Arc<Tab>,
        url: &str,
        max_attempts: u32,
    ) -> Result<NavigationResult, BrowserError> {
        let mut html = self.fetch_simple_on_tab(tab, url, None).await?;
        self.dismiss_cookie_consent(tab).await;

        let mut final_url = tab.get_url();
        let mut active_tab = tab.clone();

        for _ in 0..max_attempts {
            let Some(href) = find_clickable_jobs_link(&html, &final_url) else {
                break;
            };
            let before_len = html.len();
            let before_tab_count = self.browser.get_tabs().lock().unwrap().len();

            if active_tab.find_element(&format!("a[href='{href}']")).is_err() {
                break;
            }
            if let Ok(e) = active_tab.find_element(&format!("a[href='{href}']")) {
                let _ = e.click();
            }

            tokio::time::sleep(NEW_TAB_WAIT).await;
            let after_tab_count = self.browser.get_tabs().lock().unwrap().len();
            if after_tab_count > before_tab_count {
                if let Some(new_tab) = self.browser.get_tabs().lock().unwrap().last().cloned() {
                    active_tab = new_tab;
                }
            }

            tokio::time::sleep(POST_CLICK_SETTLE).await;
            let candidate_html = active_tab.get_content().unwrap_or_default();
            let candidate_url = active_tab.get_url();

            let grew_enough = grew_by_ratio(before_len, candidate_html.len(), SPA_GROWTH_RATIO);
            let landed_on_known_ats = detect_platform_from_url(&candidate_url).is_some();

            if grew_enough || landed_on_known_ats {
                html = candidate_html;
                final_url = candidate_url;
            } else {
                break;
            }
        }

        html = self.load_spa_content(&active_tab, html).await;

        if let Some(iframe_url) = self.external_iframe_fallback(&active_tab, &html) {
            final_url = iframe_url;
        }

        Ok(NavigationResult { html, final_url })
    }

    async fn dismiss_cookie_consent(&self, tab: &Arc<Tab>) {
        const CMP_SELECTORS: &[&str] = &[
            "#cmpbox",
            ".cmp-container",
            "#onetrust-banner-sdk",
            "[class*='cookie-consent']",
            "[id*='cookie']",
            "[class*='consent']",
        ];

        for _ in 0..COOKIE_POLL_COUNT {
            for selector in CMP_SELECTORS {
                if tab.find_element(selector).is_ok() {
                    if self.click_accept_all(tab).await {
                        return;
                    }
                }
            }
            tokio::time::sleep(COOKIE_POLL_INTERVAL).await;
        }
    }

    /// Click the first visible element whose text matches an accept-all
    /// pattern. Never accepts partial consent; never rejects (§4.3).
    async fn click_accept_all(&self, tab: &Arc<Tab>) -> bool {
        let Ok(elements) = tab.find_elements("button, a, [role='button'], div[onclick]") else {
            return false;
        };
        for el in elements {
            let Ok(text) = el.get_inner_text() else {
                continue;
            };
            if matches_cookie_accept(&text) {
                if el.click().is_ok() {
                    return true;
                }
            }
        }
        false
    }

    /// Scroll the page in steps while polling a job-card selector's count;
    /// stop when stable across two polls or after `max_scroll_iterations`.
    async fn load_spa_content(&self, tab: &Arc<Tab>, fallback_html: String) -> String {
        let mut previous_count = -1i64;
        let mut stable_polls = 0;

        for _ in 0..self.config.max_scroll_iterations {
            let count = tab
                .evaluate("document.querySelectorAll('article').length", false)
                .ok()
                .and_then(|r| r.value)
                .and_then(|v| v.as_i64())
                .unwrap_or(-1);

            if count == previous_count {
                stable_polls += 1;
                if stable_polls >= 2 {
                    break;
                }
            } else {
                stable_polls = 0;
            }
            previous_count = count;

            let _ = tab.evaluate("window.scrollBy(0, document.body.scrollHeight)", false);
            tokio::time::sleep(Duration::from_millis(400)).await;
        }

        let _ = tab.evaluate("window.scrollTo(0, 0)", false);
        tab.get_content().unwrap_or(fallback_html)
    }

    /// If the final DOM still lacks a jobs listing, inspect frames for a
    /// known external-ATS pattern and hand off to it (§4.3).
    fn external_iframe_fallback(&self, _tab: &Arc<Tab>, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("iframe[src]").ok()?;
        for el in document.select(&selector) {
            if let Some(src) = el.value().attr("src") {
                if detect_platform_from_url(src).is_some() {
                    return Some(src.to_string());
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub html: String,
    pub final_url: String,
}

fn grew_by_ratio(before: usize, after: usize, ratio: f64) -> bool {
    if before == 0 {
        return after > 0;
    }
    (after as f64 - before as f64) / before as f64 > ratio
}

fn find_clickable_jobs_link(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").ok()?;
    let base = Url::parse(base_url).ok();

    for el in document.select(&selector) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let text = el.text().collect::<String>();
        if is_jobs_link_candidate(href, &text) {
            let resolved = base
                .as_ref()
                .and_then(|b| b.join(href).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| href.to_string());
            return Some(resolved);
        }
    }
    None
}

fn classify_launch_error(e: anyhow::Error) -> BrowserError {
    if jobscout_core::patterns::is_network_unreachable_message(&e.to_string()) {
        BrowserError::DomainUnreachable(e.to_string())
    } else {
        BrowserError::Other(e)
    }
}

fn classify_nav_error(e: anyhow::Error) -> BrowserError {
    classify_launch_error(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jobs_link_candidate_excludes_per_job_detail_patterns() {
        assert!(is_jobs_link_candidate("/careers", "Open Positions"));
        assert!(!is_jobs_link_candidate("/job/123-stellenprofil", "Apply"));
        assert!(!is_jobs_link_candidate("/jobs/42#apply", "Apply now"));
    }

    #[test]
    fn growth_ratio_threshold() {
        assert!(grew_by_ratio(100, 130, 0.20));
        assert!(!grew_by_ratio(100, 110, 0.20));
        assert!(grew_by_ratio(0, 5, 0.20));
    }

    #[test]
    fn finds_external_ats_iframe() {
        let fetcher_html = r#"<html><body><iframe src="https://boards.greenhouse.io/acme"></iframe></body></html>"#;
        let document = Html::parse_document(fetcher_html);
        let selector = Selector::parse("iframe[src]").unwrap();
        let src = document
            .select(&selector)
            .next()
            .and_then(|e| e.value().attr("src"))
            .unwrap();
        assert_eq!(detect_platform_from_url(src), Some("greenhouse"));
    }
}
