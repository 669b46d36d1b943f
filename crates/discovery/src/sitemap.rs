//! Sitemap walk: robots.txt `Sitemap:` directive extraction, sitemap-index
//! recursion, and CAREER-pattern-based URL prioritization (§4.4 step 2).

use jobscout_core::patterns::{matches_career_pattern, CAREER_PATTERNS, GENERAL_CAREERS_SUFFIXES, JOB_LISTING_SUFFIXES};
use jobscout_http::HttpFetcher;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::sync::Arc;

pub const MAX_SITEMAP_URLS: usize = 300;

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("sitemap XML was not well-formed")]
    MalformedXml,
    #[error(transparent)]
    Fetch(#[from] jobscout_http::FetchError),
}

/// Extract `Sitemap: <url>` directives from a robots.txt body.
pub fn extract_sitemap_directives(robots_txt: &str) -> Vec<String> {
    robots_txt
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let lower = line.to_lowercase();
            lower
                .strip_prefix("sitemap:")
                .map(|_| line[line.find(':').unwrap() + 1..].trim().to_string())
        })
        .collect()
}

/// Parsed `<loc>` entries from a `<urlset>`, or nested sitemap refs from a
/// `<sitemapindex>`.
#[derive(Debug, Default)]
struct SitemapDocument {
    urls: Vec<String>,
    nested_sitemaps: Vec<String>,
}

fn parse_sitemap_xml(body: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut doc = SitemapDocument::default();
    let mut in_sitemap_tag = false;
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(_) => return Err(SitemapError::MalformedXml),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                match e.name().as_ref() {
                    b"sitemap" => in_sitemap_tag = true,
                    b"loc" => in_loc = true,
                    _ => {}
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"sitemap" => in_sitemap_tag = false,
                b"loc" => in_loc = false,
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_loc {
                    let text = t.unescape().map_err(|_| SitemapError::MalformedXml)?.to_string();
                    if in_sitemap_tag {
                        doc.nested_sitemaps.push(text);
                    } else {
                        doc.urls.push(text);
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(doc)
}

/// Fetch and walk a sitemap (following index nesting), capping total URLs
/// at [`MAX_SITEMAP_URLS`] and ordering career-shaped URLs first.
pub async fn walk_sitemap(
    fetcher: &Arc<HttpFetcher>,
    sitemap_url: &str,
) -> Result<Vec<String>, SitemapError> {
    let mut collected = Vec::new();
    walk_sitemap_inner(fetcher, sitemap_url, &mut collected, 0).await?;
    collected.truncate(MAX_SITEMAP_URLS);
    collected.sort_by_key(|url| std::cmp::Reverse(career_priority(url)));
    Ok(collected)
}

fn walk_sitemap_inner<'a>(
    fetcher: &'a Arc<HttpFetcher>,
    url: &'a str,
    collected: &'a mut Vec<String>,
    depth: u32,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), SitemapError>> + 'a>> {
    Box::pin(async move {
        if depth > 2 || collected.len() >= MAX_SITEMAP_URLS {
            return Ok(());
        }
        let Some(resp) = fetcher.get(url).await? else {
            return Ok(());
        };
        let doc = parse_sitemap_xml(&resp.body)?;
        collected.extend(doc.urls);

        for nested in doc.nested_sitemaps {
            if collected.len() >= MAX_SITEMAP_URLS {
                break;
            }
            walk_sitemap_inner(fetcher, &nested, collected, depth + 1).await?;
        }
        Ok(())
    })
}

/// Higher priority for job-listing-suffixed URLs, then career-patterned
/// URLs, then general-careers suffixes, used to break ties when the URL
/// count is capped.
fn career_priority(url: &str) -> u8 {
    let lower = url.to_lowercase();
    if JOB_LISTING_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        3
    } else if matches_career_pattern(&lower) && CAREER_PATTERNS.iter().any(|re| re.is_match(&lower)) {
        2
    } else if GENERAL_CAREERS_SUFFIXES.iter().any(|s| lower.contains(s)) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_sitemap_directives_case_insensitively() {
        let robots = "User-agent: *\nSitemap: https://acme.com/sitemap.xml\nDisallow: /admin";
        assert_eq!(
            extract_sitemap_directives(robots),
            vec!["https://acme.com/sitemap.xml"]
        );
    }

    #[test]
    fn parses_urlset_locs() {
        let xml = r#"<?xml version="1.0"?>
            <urlset><url><loc>https://acme.com/jobs</loc></url>
            <url><loc>https://acme.com/about</loc></url></urlset>"#;
        let doc = parse_sitemap_xml(xml).unwrap();
        assert_eq!(doc.urls, vec!["https://acme.com/jobs", "https://acme.com/about"]);
        assert!(doc.nested_sitemaps.is_empty());
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let bogus = "<urlset><url><loc>bad</wrongtag></url></urlset>";
        assert!(parse_sitemap_xml(bogus).is_err());
    }

    #[test]
    fn job_suffixed_urls_rank_above_general_careers() {
        assert!(career_priority("https://acme.com/jobs") > career_priority("https://acme.com/career"));
    }
}
