//! Shared helpers every platform parser builds on.

use jobscout_core::{ExtractionMethod, JobCandidate};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

pub fn build_full_url(href: &str, base_url: &str) -> String {
    Url::parse(base_url)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

static NEW_BADGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*\[?new\]?\s*$").unwrap());

/// Strip a trailing "New" badge that platforms append to recently posted
/// titles; not a listing's actual title content.
pub fn clean_title(title: &str) -> String {
    NEW_BADGE.replace(title, "").trim().to_string()
}

static EMPLOYMENT_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Permanent employee|Intern\s*/\s*Student|Working student|Freelancer|Full-time|Part-time|Teilzeit|Vollzeit)").unwrap()
});
static LOCATION_AFTER_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"·\s*([^·]+)").unwrap());

/// Split Personio-style "Title (all)Full-time·Location" runs of text into
/// (title, location) when no structural markup separates them.
pub fn split_title_location(text: &str) -> (String, String) {
    if let Some(m) = EMPLOYMENT_TYPE.find(text) {
        let idx = m.start();
        if idx > 0 {
            let title = text[..idx].trim().to_string();
            let remainder = &text[idx..];
            let location = LOCATION_AFTER_DOT
                .captures(remainder)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            return (title, location);
        }
    }
    (text.trim().to_string(), "Unknown".to_string())
}

pub fn candidate(title: &str, url: &str, location: &str, platform: &str) -> JobCandidate {
    let mut c = JobCandidate::new(title, ExtractionMethod::JobBoard);
    c.url = Some(url.to_string());
    c.location = Some(location.to_string());
    c.platform = Some(platform.to_string());
    c
}
