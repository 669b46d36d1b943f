//! Odoo HR Recruitment module parser. Sites self-identify via
//! `<meta name="generator" content="Odoo">` and `o_website_hr_recruitment_*`
//! / `oe_website_jobs` classes.

use crate::base::build_full_url;
use jobscout_core::{ExtractionMethod, JobCandidate};
use scraper::{Html, Selector};

pub fn is_odoo_site(html: &str) -> bool {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse(r#"meta[name="generator"]"#) else {
        return false;
    };
    document
        .select(&sel)
        .any(|e| e.value().attr("content").unwrap_or("").eq_ignore_ascii_case("odoo"))
}

pub fn parse(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let document = Html::parse_document(html);
    let Ok(card_sel) = Selector::parse(r#".card.card-default, [class*="o_job"], a[href*="/jobs/detail/"]"#)
    else {
        return Vec::new();
    };
    let link_sel = Selector::parse("a").unwrap();

    let mut jobs = Vec::new();
    for card in document.select(&card_sel) {
        let link = if card.value().name() == "a" {
            Some(card)
        } else {
            card.select(&link_sel).next()
        };
        let Some(link) = link else {
            continue;
        };
        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }
        let href = link.value().attr("href").unwrap_or("");
        let job_url = build_full_url(href, base_url);

        let mut c = JobCandidate::new(title, ExtractionMethod::JobBoard);
        c.url = Some(job_url);
        c.location = Some("Unknown".to_string());
        c.platform = Some("odoo".to_string());
        jobs.push(c);
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_odoo_generator_tag() {
        let html = r#"<html><head><meta name="generator" content="Odoo"/></head></html>"#;
        assert!(is_odoo_site(html));
        assert!(!is_odoo_site("<html></html>"));
    }
}
