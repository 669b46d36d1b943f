//! Schema.org extractor (C7): `application/ld+json` / `application/json`
//! `JobPosting` blocks, with `@graph` and root-array traversal, plus a
//! microdata fallback.

use crate::base::build_full_url;
use jobscout_core::{ExtractionMethod, JobCandidate};
use scraper::{Html, Selector};
use serde_json::Value;

pub fn extract(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let mut jobs = extract_json_ld(html, base_url);
    if jobs.is_empty() {
        jobs = extract_microdata(html, base_url);
    }
    jobs
}

fn extract_json_ld(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse(r#"script[type="application/ld+json"], script[type="application/json"]"#)
    else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for script in document.select(&sel) {
        let text = script.text().collect::<String>();
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            collect_job_postings(&value, base_url, &mut jobs);
        }
    }
    jobs
}

fn collect_job_postings(value: &Value, base_url: &str, jobs: &mut Vec<JobCandidate>) {
    match value {
        Value::Object(map) => {
            if map.get("@type").and_then(Value::as_str) == Some("JobPosting") {
                if let Some(job) = build_candidate(map, base_url) {
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

fn build_candidate(map: &serde_json::Map<String, Value>, base_url: &str) -> Option<JobCandidate> {
    let title = map.get("title").or_else(|| map.get("name")).and_then(Value::as_str)?;

    let location = map.get("jobLocation").and_then(|loc| match loc {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => loc
            .get("address")
            .and_then(|a| match a {
                Value::String(s) => Some(s.clone()),
                Value::Object(_) => a.get("addressLocality").and_then(Value::as_str).map(String::from),
                _ => None,
            }),
        _ => None,
    });

    let company = map
        .get("hiringOrganization")
        .and_then(|o| o.get("name"))
        .and_then(Value::as_str)
        .map(String::from);

    let url = map
        .get("url")
        .and_then(Value::as_str)
        .map(|u| build_full_url(u, base_url))
        .unwrap_or_else(|| base_url.to_string());

    let mut c = JobCandidate::new(title, ExtractionMethod::SchemaOrg);
    c.url = Some(url);
    c.location = location.or_else(|| Some("Unknown".to_string()));
    c.company = company;
    Some(c)
}

/// Microdata fallback: `[itemtype*=JobPosting]` blocks with `itemprop`
/// children for title/location/company.
fn extract_microdata(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(item_sel) = Selector::parse("[itemtype*='JobPosting']") else {
        return Vec::new();
    };
    let title_sel = Selector::parse("[itemprop='title'], [itemprop='name']").unwrap();
    let location_sel = Selector::parse("[itemprop='addressLocality']").unwrap();
    let company_sel = Selector::parse("[itemprop='hiringOrganization']").unwrap();

    let mut jobs = Vec::new();
    for item in document.select(&item_sel) {
        let Some(title) = item
            .select(&title_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
        else {
            continue;
        };
        let location = item
            .select(&location_sel)
            .next()
            .map(|e| e.text().collect::<String>());
        let company = item
            .select(&company_sel)
            .next()
            .map(|e| e.text().collect::<String>());
        let href = item.value().attr("href").unwrap_or("");

        let mut c = JobCandidate::new(title, ExtractionMethod::SchemaOrg);
        c.url = Some(build_full_url(href, base_url));
        c.location = location.or_else(|| Some("Unknown".to_string()));
        c.company = company;
        jobs.push(c);
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_array_of_job_postings_without_graph_wrapper() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            [
                {"@type": "JobPosting", "title": "Data Engineer", "url": "/jobs/1",
                 "jobLocation": {"address": {"addressLocality": "Vienna"}},
                 "hiringOrganization": {"name": "Acme GmbH"}},
                {"@type": "JobPosting", "title": "QA Analyst", "url": "/jobs/2"}
            ]
            </script>
        </head></html>"#;
        let jobs = extract(html, "https://acme.com");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Data Engineer");
        assert_eq!(jobs[0].location.as_deref(), Some("Vienna"));
        assert_eq!(jobs[0].company.as_deref(), Some("Acme GmbH"));
    }

    #[test]
    fn traverses_graph_array() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@graph": [{"@type": "WebPage"}, {"@type": "JobPosting", "title": "Recruiter"}]}
            </script>
        </head></html>"#;
        let jobs = extract(html, "https://acme.com");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Recruiter");
    }
}
