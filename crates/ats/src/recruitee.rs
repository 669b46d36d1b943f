//! Recruitee parser: jobs are usually loaded client-side from `/api/offers`
//! and embedded as JSON in a script tag; falls back to link scraping when
//! the HTML happens to be server-rendered.

use crate::base::{build_full_url, candidate};
use jobscout_core::JobCandidate;
use scraper::{Html, Selector};
use serde_json::Value;

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let jobs = extract_from_embedded_json(html, base_url);
    if !jobs.is_empty() {
        return jobs;
    }
    extract_from_links(html, base_url)
}

/// Derive the `/api/offers` endpoint for a Recruitee careers page — same
/// host, API path, dropping any page-specific suffix.
pub fn api_offers_url(careers_url: &str) -> Option<String> {
    let parsed = url::Url::parse(careers_url).ok()?;
    let scheme = parsed.scheme();
    let host = parsed.host_str()?;
    Some(format!("{scheme}://{host}/api/offers/"))
}

/// Parse a raw `/api/offers` JSON response directly, without the HTML
/// script-tag wrapper `extract_from_embedded_json` expects.
pub fn parse_api_response(body: &str, base_url: &str) -> Vec<JobCandidate> {
    let Some(offers) = find_offers_array(body) else {
        return Vec::new();
    };
    offers_to_candidates(&offers, base_url)
}

fn extract_from_embedded_json(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse("script") else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for script in document.select(&sel) {
        let text = script.text().collect::<String>();
        let Some(offers) = find_offers_array(&text) else {
            continue;
        };
        jobs.extend(offers_to_candidates(&offers, base_url));
    }
    jobs
}

fn offers_to_candidates(offers: &[Value], base_url: &str) -> Vec<JobCandidate> {
    let mut jobs = Vec::new();
    for offer in offers {
        let Some(title) = offer.get("title").and_then(Value::as_str) else {
            continue;
        };
        let slug = offer.get("slug").and_then(Value::as_str).unwrap_or("");
        let location = offer
            .get("city")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        let url = build_full_url(&format!("/o/{slug}"), base_url);
        jobs.push(candidate(title, &url, location, "recruitee"));
    }
    jobs
}

/// Scan a script body for a JSON value (object or array) that contains an
/// `offers` array, without assuming the surrounding assignment syntax.
fn find_offers_array(script_text: &str) -> Option<Vec<Value>> {
    let start = script_text.find('{').or_else(|| script_text.find('['))?;
    let value: Value = serde_json::from_str(&script_text[start..]).ok().or_else(|| {
        balanced_json_slice(script_text, start).and_then(|s| serde_json::from_str(s).ok())
    })?;
    find_offers_in_value(&value)
}

fn balanced_json_slice(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let open = bytes[start] as char;
    let close = if open == '{' { '}' } else { ']' };
    let mut depth = 0i32;
    for (i, ch) in text[start..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + i + ch.len_utf8()]);
            }
        }
    }
    None
}

fn find_offers_in_value(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(offers)) = map.get("offers") {
                return Some(offers.clone());
            }
            for v in map.values() {
                if let Some(found) = find_offers_in_value(v) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) if !items.is_empty() && items[0].get("title").is_some() => {
            Some(items.clone())
        }
        _ => None,
    }
}

fn extract_from_links(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse(r#"a[href*="/o/"]"#) else {
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
        jobs.push(candidate(&title, &job_url, "Unknown", "recruitee"));
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_link_scan_when_no_embedded_json() {
        let html = r#"<html><body>
            <a href="/o/data-analyst-123">Data Analyst</a>
        </body></html>"#;
        let jobs = parse(html, "https://careers.acme.com");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Data Analyst");
    }

    #[test]
    fn parses_raw_api_offers_response() {
        let body = r#"{"offers": [{"title": "Backend Engineer", "slug": "backend-engineer-99", "city": "Remote"}]}"#;
        let jobs = parse_api_response(body, "https://acme.recruitee.com");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Backend Engineer");
        assert_eq!(jobs[0].url.as_deref(), Some("https://acme.recruitee.com/o/backend-engineer-99"));
    }

    #[test]
    fn derives_api_offers_url_from_careers_page() {
        assert_eq!(
            api_offers_url("https://acme.recruitee.com/careers"),
            Some("https://acme.recruitee.com/api/offers/".to_string())
        );
    }
}
