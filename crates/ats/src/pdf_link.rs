//! PDF-filename extractor (§4.6/§4.7): job postings published as a bare
//! download link, with the only signal being the filename itself.

use crate::base::build_full_url;
use jobscout_core::{ExtractionMethod, JobCandidate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

const JOB_KEYWORDS: &[&str] = &[
    "stellenausschreibung",
    "stellenangebot",
    "stellenanzeige",
    "careerdescription",
    "jobdescription",
    "jobposting",
    "vacancy",
];

/// Kept uppercase when TitleCasing a derived title; anything else is
/// title-cased normally.
const ACRONYMS: &[&str] = &["IT", "HR", "QA", "CEO", "CFO", "CTO", "R&D"];

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}(-\d{2}(-\d{2})?)?$|^\d{2}\.\d{2}\.\d{4}$").unwrap());
static VERSION_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^v\d+(\.\d+)?$").unwrap());
static STRIP_WORDS: &[&str] = &["final", "draft", "copy", "de", "en", "web"];

pub fn extract(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse(r#"a[href$=".pdf"], a[href$=".doc"], a[href$=".docx"]"#) else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for link in document.select(&sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let filename = href.rsplit('/').next().unwrap_or(href).to_lowercase();
        if !JOB_KEYWORDS.iter().any(|kw| filename.contains(kw)) {
            continue;
        }

        let title = derive_title(href);
        if title.is_empty() {
            continue;
        }

        let mut c = JobCandidate::new(title, ExtractionMethod::PdfLink);
        c.url = Some(build_full_url(href, base_url));
        c.location = Some("Unknown".to_string());
        jobs.push(c);
    }
    jobs
}

fn derive_title(href: &str) -> String {
    let filename = href.rsplit('/').next().unwrap_or(href);
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);

    let words: Vec<String> = stem
        .split(|c| c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .filter(|w| !DATE_TOKEN.is_match(w))
        .filter(|w| !VERSION_TOKEN.is_match(w))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter(|w| !JOB_KEYWORDS.contains(&w.to_lowercase().as_str()))
        .filter(|w| !STRIP_WORDS.contains(&w.to_lowercase().as_str()))
        .map(title_case_word)
        .collect();

    words.join(" ")
}

fn title_case_word(word: &str) -> String {
    if let Some(acronym) = ACRONYMS.iter().find(|a| a.eq_ignore_ascii_case(word)) {
        return acronym.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_title_case_title_dropping_date_and_version() {
        let title = derive_title("/files/Stellenausschreibung_IT_Administrator_2024-03-01_v2.pdf");
        assert_eq!(title, "IT Administrator");
    }

    #[test]
    fn skips_links_without_job_keyword_in_filename() {
        let html = r#"<a href="/files/brochure.pdf">Brochure</a>"#;
        assert!(extract(html, "https://acme.com").is_empty());
    }
}
