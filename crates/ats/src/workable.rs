//! Workable parser: JSON-LD `JobPosting` structured data first, falling
//! back to link scraping for server-rendered fragments.

use crate::base::{build_full_url, candidate};
use jobscout_core::JobCandidate;
use scraper::{Html, Selector};
use serde_json::Value;

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let jobs = parse_json_ld(html, base_url);
    if !jobs.is_empty() {
        return jobs;
    }
    parse_job_links(html, base_url)
}

fn parse_json_ld(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for script in document.select(&sel) {
        let text = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        collect_job_postings(&value, base_url, &mut jobs);
    }
    jobs
}

fn collect_job_postings(value: &Value, base_url: &str, jobs: &mut Vec<JobCandidate>) {
    match value {
        Value::Object(map) => {
            if map.get("@type").and_then(Value::as_str) == Some("JobPosting") {
                if let Some(job) = extract_from_jsonld(map, base_url) {
                    jobs.push(job);
                }
            }
            if let Some(graph) = map.get("@graph").and_then(Value::as_array) {
                for item in graph {
                    collect_job_postings(item, base_url, jobs);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_job_postings(item, base_url, jobs);
            }
        }
        _ => {}
    }
}

fn extract_from_jsonld(map: &serde_json::Map<String, Value>, base_url: &str) -> Option<JobCandidate> {
    let title = map
        .get("title")
        .or_else(|| map.get("name"))
        .and_then(Value::as_str)?;

    let location = map
        .get("jobLocation")
        .and_then(|l| l.get("address"))
        .and_then(|a| a.get("addressLocality"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown");

    let url = map
        .get("url")
        .and_then(Value::as_str)
        .map(|u| build_full_url(u, base_url))
        .unwrap_or_else(|| base_url.to_string());

    Some(candidate(title, &url, location, "workable"))
}

fn parse_job_links(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse(r#"a[href*="/j/"]"#) else {
        return Vec::new();
    };
    let mut jobs = Vec::new();
    for link in document.select(&sel) {
        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }
        let href = link.value().attr("href").unwrap_or("");
        let job_url = build_full_url(href, base_url);
        jobs.push(candidate(&title, &job_url, "Unknown", "workable"));
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_job_posting_from_json_ld() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "JobPosting", "title": "Product Manager",
             "url": "https://apply.workable.com/acme/j/ABC123",
             "jobLocation": {"address": {"addressLocality": "Munich"}}}
            </script>
        </head></html>"#;
        let jobs = parse(html, "https://apply.workable.com/acme");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Product Manager");
        assert_eq!(jobs[0].location.as_deref(), Some("Munich"));
    }
}
