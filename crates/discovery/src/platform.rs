//! Platform Detector (C5): external-ATS URL/HTML signatures and link
//! extraction.

use jobscout_core::patterns::{detect_platform_from_url, is_skip_listed_url};
use scraper::{Html, Selector};
use url::Url;

/// Detect the ATS platform from a URL, falling back to an HTML signature
/// scan (currently: Recruitee's footer/CDN/script fingerprints).
pub fn detect(url: &str, html: Option<&str>) -> Option<&'static str> {
    if let Some(tag) = detect_platform_from_url(url) {
        return Some(tag);
    }
    if let Some(html) = html {
        if detect_recruitee_from_html(html) {
            return Some("recruitee");
        }
    }
    None
}

pub fn detect_recruitee_from_html(html: &str) -> bool {
    let lower = html.to_lowercase();
    if lower.contains("recruiteecdn.com") || lower.contains("recruitee") {
        let document = Html::parse_document(html);
        if let Ok(sel) = Selector::parse("a[href]") {
            for el in document.select(&sel) {
                let href = el.value().attr("href").unwrap_or("").to_lowercase();
                let text = el.text().collect::<String>().to_lowercase();
                if href.contains("recruitee") || text.contains("recruitee") {
                    return true;
                }
            }
        }
        return true;
    }
    false
}

/// Normalize a discovered board URL to its main listing page, per platform
/// (§4.5). Greenhouse/Workable keep the company slug; Deloitte keeps the
/// full URL including query; everything else keeps only `language=`.
pub fn normalize_board_url(url: &str, platform: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let scheme = parsed.scheme();
    let host = parsed.host_str().unwrap_or_default();

    if platform == "greenhouse" {
        let slug = parsed
            .path_segments()
            .and_then(|mut s| s.next())
            .filter(|s| !s.is_empty());
        return match slug {
            Some(s) => format!("{scheme}://{host}/{s}"),
            None => format!("{scheme}://{host}/"),
        };
    }

    if platform == "workable" {
        let slug = parsed
            .path_segments()
            .and_then(|mut s| s.next())
            .filter(|s| !s.is_empty());
        return match slug {
            Some(s) => format!("{scheme}://{host}/{s}/"),
            None => format!("{scheme}://{host}/"),
        };
    }

    if platform == "deloitte" {
        return url.to_string();
    }

    let lang = parsed
        .query_pairs()
        .find(|(k, _)| k == "language")
        .map(|(_, v)| format!("?language={v}"))
        .unwrap_or_default();
    format!("{scheme}://{host}/{lang}")
}

fn is_job_board_url_valid(url: &str) -> bool {
    !is_skip_listed_url(url)
}

const NORMALIZE_PLATFORMS: &[&str] = &["greenhouse", "personio", "workable"];

/// Scan links, iframes, `data-src` attributes and inline scripts for an
/// external ATS URL; skip-listed pages (privacy/imprint/...) are excluded
/// unless every candidate is skip-listed, in which case the first one is
/// normalized and returned anyway (§4.5).
pub fn find_external_board(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let mut found: Vec<(String, &'static str)> = Vec::new();

    if let Ok(sel) = Selector::parse("a[href]") {
        for el in document.select(&sel) {
            if let Some(href) = el.value().attr("href") {
                if let Some(tag) = detect_platform_from_url(href) {
                    found.push((href.to_string(), tag));
                }
            }
        }
    }
    if let Ok(sel) = Selector::parse("iframe[src]") {
        for el in document.select(&sel) {
            if let Some(src) = el.value().attr("src") {
                if let Some(tag) = detect_platform_from_url(src) {
                    found.push((src.to_string(), tag));
                }
            }
        }
    }
    if let Ok(sel) = Selector::parse("[data-src]") {
        for el in document.select(&sel) {
            if let Some(src) = el.value().attr("data-src") {
                if let Some(tag) = detect_platform_from_url(src) {
                    found.push((src.to_string(), tag));
                }
            }
        }
    }
    if let Ok(sel) = Selector::parse("script") {
        for el in document.select(&sel) {
            let text = el.text().collect::<String>();
            if let Some(tag) = detect_platform_from_url(&text) {
                if let Some(url) = extract_url_near_match(&text) {
                    found.push((url, tag));
                }
            }
        }
    }

    if found.is_empty() {
        return None;
    }

    let mut seen = std::collections::HashSet::new();
    let mut best: Option<String> = None;

    for (url, platform) in &found {
        if !is_job_board_url_valid(url) {
            continue;
        }
        if NORMALIZE_PLATFORMS.contains(platform) {
            let normalized = normalize_board_url(url, platform);
            if seen.insert(normalized.clone()) && best.is_none() {
                best = Some(normalized);
            }
        } else if best.is_none() {
            best = Some(url.clone());
        }
    }

    if best.is_some() {
        return best;
    }

    let (url, platform) = &found[0];
    Some(normalize_board_url(url, platform))
}

fn extract_url_near_match(script_text: &str) -> Option<String> {
    let re = regex::Regex::new(r#"https?://[^\s"'<>]+"#).ok()?;
    re.find(script_text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_greenhouse_to_company_slug() {
        assert_eq!(
            normalize_board_url("https://boards.greenhouse.io/acme/jobs/123", "greenhouse"),
            "https://boards.greenhouse.io/acme"
        );
    }

    #[test]
    fn normalizes_workable_keeps_trailing_slash() {
        assert_eq!(
            normalize_board_url("https://apply.workable.com/acme/gdpr_policy", "workable"),
            "https://apply.workable.com/acme/"
        );
    }

    #[test]
    fn deloitte_keeps_query_string() {
        let url = "https://job.deloitte.com/search?search=27pilots";
        assert_eq!(normalize_board_url(url, "deloitte"), url);
    }

    #[test]
    fn finds_board_link_and_skips_privacy_pages() {
        let html = r#"<html><body>
            <a href="https://acme.jobs.personio.de/privacy-policy">Privacy</a>
            <a href="https://acme.jobs.personio.de/job/42">Job</a>
        </body></html>"#;
        let found = find_external_board(html).unwrap();
        assert_eq!(found, "https://acme.jobs.personio.de/");
    }
}
