//! HiBob parser: Angular custom elements (`b-virtual-scroll-list-item`,
//! `b-heading`), titles often carrying a gender-notation suffix like
//! `(f/m/d)`.

use crate::base::build_full_url;
use jobscout_core::{ExtractionMethod, JobCandidate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

static GENDER_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\([fmwdx]/[fmwdx]").unwrap());

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(item_sel) = Selector::parse("b-virtual-scroll-list-item") else {
        return Vec::new();
    };
    let heading_sel = Selector::parse("b-heading").unwrap();
    let div_sel = Selector::parse("div").unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();

    let mut jobs = Vec::new();
    let mut seen_titles = HashSet::new();

    for item in document.select(&item_sel) {
        let title = item
            .select(&heading_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| {
                item.select(&div_sel)
                    .map(|d| d.text().collect::<String>())
                    .find(|t| GENDER_MARK.is_match(t))
            });

        let Some(title) = title else {
            continue;
        };
        if !seen_titles.insert(title.clone()) {
            continue;
        }

        let href = item
            .select(&link_sel)
            .next()
            .and_then(|e| e.value().attr("href"))
            .unwrap_or("");
        let job_url = build_full_url(href, base_url);

        let mut c = JobCandidate::new(title, ExtractionMethod::JobBoard);
        c.url = Some(job_url);
        c.location = Some("Unknown".to_string());
        c.platform = Some("hibob".to_string());
        jobs.push(c);
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_gender_marked_div_when_no_heading() {
        let html = r#"<html><body>
            <b-virtual-scroll-list-item>
                <a href="/jobs/1"></a>
                <div>Backend Engineer (f/m/d)</div>
            </b-virtual-scroll-list-item>
        </body></html>"#;
        let jobs = parse(html, "https://careers.hibob.com/acme");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Backend Engineer (f/m/d)");
    }
}
