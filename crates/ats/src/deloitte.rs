//! Deloitte parser (job.deloitte.com): a complex SPA portal that offers no
//! stable markup, only a handful of URL shapes to recognize job links by.
//! Yields to LLM extraction upstream when this returns nothing.

use crate::base::build_full_url;
use jobscout_core::{ExtractionMethod, JobCandidate};
use scraper::{Html, Selector};
use std::collections::HashSet;

const JOB_LINK_PATTERNS: &[&str] = &["/job/", "/stelle/", "/position/", "jobdetail"];

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
        let href_lower = href.to_lowercase();
        if !JOB_LINK_PATTERNS.iter().any(|p| href_lower.contains(p)) {
            continue;
        }
        let job_url = build_full_url(href, base_url);
        if !seen.insert(job_url.clone()) {
            continue;
        }

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let mut c = JobCandidate::new(title, ExtractionMethod::JobBoard);
        c.url = Some(job_url);
        c.location = Some("Unknown".to_string());
        c.platform = Some("deloitte".to_string());
        jobs.push(c);
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_any_of_the_job_link_shapes() {
        let html = r#"<html><body>
            <a href="/en/stelle/123-consultant">Consultant</a>
            <a href="/en/about">About us</a>
        </body></html>"#;
        let jobs = parse(html, "https://job.deloitte.com/search?search=acme");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Consultant");
    }
}
