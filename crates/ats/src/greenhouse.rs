//! Greenhouse parser: new `job-boards.greenhouse.io` table format, falling
//! back to the legacy `boards.greenhouse.io` `.opening` format.

use crate::base::{build_full_url, candidate, clean_title};
use jobscout_core::JobCandidate;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let jobs = parse_new_format(html, base_url);
    if !jobs.is_empty() {
        return jobs;
    }
    parse_legacy_format(html, base_url)
}

fn parse_new_format(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(link_sel) = Selector::parse(r#"a[href*="/jobs/"]"#) else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    let mut seen = HashSet::new();

    for link in document.select(&link_sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let job_url = build_full_url(href, base_url);
        if !seen.insert(job_url.clone()) {
            continue;
        }

        let children: Vec<ElementRef> = link.children().filter_map(ElementRef::wrap).collect();
        let (title, location) = if children.len() >= 2 {
            (
                clean_title(&children[0].text().collect::<String>()),
                children[1].text().collect::<String>(),
            )
        } else {
            let full_text = link.text().collect::<String>();
            (clean_title(&full_text), "Unknown".to_string())
        };

        if !title.is_empty() {
            jobs.push(candidate(&title, &job_url, if location.is_empty() { "Unknown" } else { &location }, "greenhouse"));
        }
    }
    jobs
}

fn parse_legacy_format(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(opening_sel) = Selector::parse(r#".opening, .job-post, [data-mapped="true"]"#) else {
        return Vec::new();
    };
    let title_sel = Selector::parse("a, .opening-title, .job-title").unwrap();
    let location_sel = Selector::parse(".location, .job-location").unwrap();

    let mut jobs = Vec::new();
    for opening in document.select(&opening_sel) {
        let Some(title_elem) = opening.select(&title_sel).next() else {
            continue;
        };
        let title = clean_title(&title_elem.text().collect::<String>());
        let href = title_elem.value().attr("href").unwrap_or("");
        let job_url = build_full_url(href, base_url);
        let location = opening
            .select(&location_sel)
            .next()
            .map(|e| e.text().collect::<String>())
            .unwrap_or_else(|| "Unknown".to_string());

        if !title.is_empty() {
            jobs.push(candidate(&title, &job_url, &location, "greenhouse"));
        }
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_opening_format() {
        let html = r#"<html><body>
            <div class="opening">
                <a href="/positions/123">Senior Engineer New</a>
                <span class="location">Berlin</span>
            </div>
        </body></html>"#;
        let jobs = parse(html, "https://boards.greenhouse.io/acme");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Senior Engineer");
        assert_eq!(jobs[0].location.as_deref(), Some("Berlin"));
    }
}
