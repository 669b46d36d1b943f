//! HRworks parser (hrworks.de): job title/detail links both carry the
//! `job-offer-content` class, so each job appears twice; dedup by URL.

use crate::base::build_full_url;
use jobscout_core::{ExtractionMethod, JobCandidate};
use scraper::{Html, Selector};
use std::collections::HashSet;

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse("a.job-offer-content") else {
        return Vec::new();
    };
    let h2_sel = Selector::parse("h2").unwrap();

    let mut jobs = Vec::new();
    let mut seen = HashSet::new();

    for link in document.select(&sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("?id=") {
            continue;
        }
        let job_url = build_full_url(href, base_url);
        if !seen.insert(job_url.clone()) {
            continue;
        }

        let title = link
            .select(&h2_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| link.text().collect::<String>().trim().to_string());
        if title.is_empty() {
            continue;
        }

        let mut c = JobCandidate::new(title, ExtractionMethod::JobBoard);
        c.url = Some(job_url);
        c.location = Some("Unknown".to_string());
        c.platform = Some("hrworks".to_string());
        jobs.push(c);
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_job_appearing_in_title_and_description_links() {
        let html = r#"<html><body>
            <a class="job-offer-content" href="/de?id=42"><h2>DevOps Engineer</h2></a>
            <a class="job-offer-content" href="/de?id=42">Read more</a>
        </body></html>"#;
        let jobs = parse(html, "https://jobs.acme.de");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "DevOps Engineer");
    }
}
