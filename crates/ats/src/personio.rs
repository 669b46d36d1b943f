//! Personio parser: flat `/job/<id>` links whose text runs together title,
//! employment type and location with no separating markup.

use crate::base::{build_full_url, split_title_location};
use jobscout_core::{ExtractionMethod, JobCandidate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

static ALL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*\(all\)\s*$").unwrap());

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    let mut seen = HashSet::new();

    for link in document.select(&sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/job/") {
            continue;
        }
        let job_url = build_full_url(href, base_url);
        if !seen.insert(job_url.clone()) {
            continue;
        }

        let text = link.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }

        let (title, location) = split_title_location(&text);
        let title = ALL_SUFFIX.replace(&title, "").trim().to_string();
        if title.is_empty() {
            continue;
        }

        let mut c = JobCandidate::new(title, ExtractionMethod::JobBoard);
        c.url = Some(job_url);
        c.location = Some(location);
        c.platform = Some("personio".to_string());
        jobs.push(c);
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_title_from_employment_and_location() {
        let html = r#"<html><body>
            <a href="/job/42">Software Engineer (all) Full-time·Remote·Berlin</a>
        </body></html>"#;
        let jobs = parse(html, "https://acme.jobs.personio.de");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Software Engineer");
        assert_eq!(jobs[0].location.as_deref(), Some("Remote"));
    }
}
