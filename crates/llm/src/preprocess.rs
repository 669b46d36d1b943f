//! HTML -> markdown-like pruning before it reaches the LLM prompt (§4.8).

use jobscout_core::patterns::matches_career_pattern;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

pub const MAX_CHARS: usize = 80_000;

const STRIP_TAGS: &[&str] = &["script", "style", "svg", "noscript", "head", "meta", "link", "iframe"];
const LOW_DENSITY_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// A `<nav>/<header>/<footer>/<aside>` block is kept only if its job-marker
/// density clears a size-scaled threshold; otherwise it's boilerplate.
fn has_enough_job_markers(text: &str) -> bool {
    let markers = count_career_markers(text);
    let len = text.len();
    if len > 500 {
        markers >= 3
    } else if len > 200 {
        markers >= 2
    } else {
        markers >= 1
    }
}

fn count_career_markers(text: &str) -> usize {
    text.split_whitespace()
        .filter(|word| matches_career_pattern(word))
        .count()
}

/// Platform-aware "job section" selectors, tried before falling back to the
/// full pruned body; a match must fall within a sane size window.
const JOB_SECTION_SELECTORS: &[&str] = &[
    "main",
    "[class*='job']",
    "[class*='career']",
    "[id*='job']",
    "[id*='career']",
];
const JOB_SECTION_MIN: usize = 1_000;
const JOB_SECTION_MAX: usize = 600_000;

pub fn preprocess(html: &str) -> String {
    if let Some(section) = find_job_section(html) {
        return truncate(&to_markdown(&section));
    }
    truncate(&to_markdown(html))
}

fn find_job_section(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    for selector_str in JOB_SECTION_SELECTORS {
        let Ok(sel) = Selector::parse(selector_str) else {
            continue;
        };
        for el in document.select(&sel) {
            let fragment = el.html();
            if fragment.len() >= JOB_SECTION_MIN && fragment.len() <= JOB_SECTION_MAX {
                return Some(fragment);
            }
        }
    }
    None
}

fn to_markdown(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    walk(document.root_element(), &mut out);
    let collapsed = WHITESPACE.replace_all(&out, " ");
    BLANK_LINES.replace_all(&collapsed, "\n\n").trim().to_string()
}

fn walk(node: scraper::ElementRef, out: &mut String) {
    let tag = node.value().name();
    if STRIP_TAGS.contains(&tag) {
        return;
    }
    if LOW_DENSITY_TAGS.contains(&tag) {
        let text = node.text().collect::<String>();
        if !has_enough_job_markers(&text) {
            return;
        }
    }

    if tag == "table" {
        for row in node.select(&Selector::parse("tr").unwrap()) {
            let cells: Vec<String> = row
                .select(&Selector::parse("td, th").unwrap())
                .map(|c| c.text().collect::<String>().trim().to_string())
                .collect();
            if !cells.is_empty() {
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
        }
        return;
    }

    for child in node.children() {
        if let Some(el) = scraper::ElementRef::wrap(child) {
            walk(el, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
    if matches!(tag, "p" | "div" | "li" | "br" | "h1" | "h2" | "h3" | "tr") {
        out.push('\n');
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_CHARS {
        text.to_string()
    } else {
        text.chars().take(MAX_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style_content() {
        let html = "<html><body><script>alert(1)</script><style>.x{}</style><p>Careers at Acme</p></body></html>";
        let md = preprocess(html);
        assert!(!md.contains("alert"));
        assert!(md.contains("Careers at Acme"));
    }

    #[test]
    fn converts_table_rows_to_pipe_text() {
        let html = "<table><tr><td>Engineer</td><td>Berlin</td></tr></table>";
        let md = preprocess(html);
        assert!(md.contains("Engineer | Berlin"));
    }

    #[test]
    fn truncates_to_max_chars() {
        let huge = "<p>".to_string() + &"x".repeat(MAX_CHARS * 2) + "</p>";
        let md = preprocess(&huge);
        assert!(md.len() <= MAX_CHARS);
    }

    #[test]
    fn drops_low_density_nav_boilerplate() {
        let html = "<nav>Home About Contact</nav><p>Karriere Jobs Stellen Bewerben hier jetzt</p>";
        let md = preprocess(html);
        assert!(!md.contains("Home About Contact"));
        assert!(md.contains("Karriere"));
    }
}
