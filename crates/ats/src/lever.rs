//! Lever parser: `.posting` / `.posting-card` cards.

use crate::base::{build_full_url, candidate};
use jobscout_core::JobCandidate;
use scraper::{Html, Selector};

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(posting_sel) = Selector::parse(".posting, .posting-card") else {
        return Vec::new();
    };
    let title_sel = Selector::parse(".posting-title, h5").unwrap();
    let location_sel = Selector::parse(".location, .posting-categories").unwrap();
    let link_sel = Selector::parse("a.posting-title, a").unwrap();

    let mut jobs = Vec::new();
    for posting in document.select(&posting_sel) {
        let Some(title_elem) = posting.select(&title_sel).next() else {
            continue;
        };
        let title = title_elem.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }
        let href = posting
            .select(&link_sel)
            .next()
            .and_then(|e| e.value().attr("href"))
            .unwrap_or("");
        let job_url = build_full_url(href, base_url);
        let location = posting
            .select(&location_sel)
            .next()
            .map(|e| e.text().collect::<String>())
            .unwrap_or_else(|| "Unknown".to_string());

        jobs.push(candidate(&title, &job_url, &location, "lever"));
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posting_cards() {
        let html = r#"<html><body>
            <div class="posting">
                <a class="posting-title" href="/acme/123">
                    <h5>Backend Engineer</h5>
                </a>
                <span class="location">Remote</span>
            </div>
        </body></html>"#;
        let jobs = parse(html, "https://jobs.lever.co/acme");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Backend Engineer");
    }
}
