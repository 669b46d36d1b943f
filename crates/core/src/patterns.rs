//! Pattern catalogues from §6 — treated as part of the external interface,
//! since matches drive user-visible classification. Centralized here because
//! the career/cookie/network-unreachable/ATS catalogues are each consumed by
//! more than one crate (http, browser, discovery, ats).

use once_cell::sync::Lazy;
use regex::Regex;

/// CAREER URL/TEXT patterns (English, German, Russian), case-insensitive.
pub static CAREER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"career[s]?",
        r"job[s]?",
        r"vacanc(y|ies)",
        r"opening[s]?",
        r"work[-_]?with[-_]?us",
        r"join[-_]?us",
        r"hiring",
        r"positions",
        r"karriere",
        r"stellen",
        r"stellenangebote",
        r"jobangebote",
        r"arbeiten",
        r"bewerben",
        r"offene[-_]?stellen",
        r"вакансии",
        r"карьера",
        r"работа",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

pub fn matches_career_pattern(text: &str) -> bool {
    CAREER_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Job-listing suffixes beat general-careers suffixes in sitemap tie-breaks
/// (§4.4 step 2).
pub static JOB_LISTING_SUFFIXES: &[&str] = &["/jobs", "/vacancies", "/stellen", "/offene-stellen"];
pub static GENERAL_CAREERS_SUFFIXES: &[&str] = &["/career", "/careers", "/karriere"];

/// EXTERNAL ATS URL patterns keyed to a platform tag (§4.5, §6).
pub static EXTERNAL_ATS_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\.jobs\.personio\.(?:de|com)", "personio"),
        (r"job-boards\.greenhouse\.io", "greenhouse"),
        (r"boards\.greenhouse\.io", "greenhouse"),
        (r"jobs\.lever\.co", "lever"),
        (r"\.workable\.com", "workable"),
        (r"\.breezy\.hr", "breezy"),
        (r"\.recruitee\.com", "recruitee"),
        (r"\.smartrecruiters\.com", "smartrecruiters"),
        (r"\.bamboohr\.com/jobs", "bamboohr"),
        (r"\.ashbyhq\.com", "ashby"),
        (r"\.factorial\.co/job_posting", "factorial"),
        (r"\.pi-asp\.de/bewerber-web", "pi-asp"),
        (r"job\.deloitte\.com", "deloitte"),
        (r"hrworks\.de", "hrworks"),
    ]
    .iter()
    .map(|(p, tag)| (Regex::new(&format!("(?i){p}")).unwrap(), *tag))
    .collect()
});

pub fn detect_platform_from_url(url: &str) -> Option<&'static str> {
    EXTERNAL_ATS_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(url))
        .map(|(_, tag)| *tag)
}

/// COOKIE ACCEPT patterns (English, German, Russian), case-insensitive.
pub static COOKIE_ACCEPT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"accept all",
        r"allow all",
        r"agree all",
        r"i accept",
        r"accept cookies",
        r"akzeptieren",
        r"alle akzeptieren",
        r"alle bestätigen",
        r"zustimmen",
        r"einverstanden",
        r"annehmen",
        r"принять все",
        r"согласен",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

pub fn matches_cookie_accept(text: &str) -> bool {
    COOKIE_ACCEPT_PATTERNS.iter().any(|re| re.is_match(text))
}

/// NETWORK-UNREACHABLE tokens: matching one of these in an error message
/// classifies the failure as DomainUnreachable (§4.2, §4.3, §7).
pub static NETWORK_UNREACHABLE_TOKENS: &[&str] = &[
    "ERR_NAME_NOT_RESOLVED",
    "ERR_CONNECTION_REFUSED",
    "ERR_CONNECTION_RESET",
    "ERR_CONNECTION_TIMED_OUT",
    "ERR_NETWORK_CHANGED",
    "ERR_INTERNET_DISCONNECTED",
    "ERR_ADDRESS_UNREACHABLE",
    "name or service not known",
    "getaddrinfo failed",
    "[errno 111]",
    "[winerror 10061]",
    "dns error",
    "connection refused",
];

pub fn is_network_unreachable_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    NETWORK_UNREACHABLE_TOKENS
        .iter()
        .any(|tok| lower.contains(&tok.to_lowercase()))
}

/// SKIP URL patterns excluded when scanning for an external job board
/// (§4.5, §6).
pub static SKIP_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/privacy[-_]?policy",
        r"/datenschutz",
        r"/imprint",
        r"/impressum",
        r"/terms",
        r"/agb",
        r"/legal",
        r"/cookie",
        r"/contact",
        r"/kontakt",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

pub fn is_skip_listed_url(url: &str) -> bool {
    SKIP_URL_PATTERNS.iter().any(|re| re.is_match(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn career_patterns_match_multilingual() {
        assert!(matches_career_pattern("Karriere"));
        assert!(matches_career_pattern("Open Positions"));
        assert!(matches_career_pattern("вакансии"));
    }

    #[test]
    fn ats_detection_from_url() {
        assert_eq!(
            detect_platform_from_url("https://boards.greenhouse.io/acme"),
            Some("greenhouse")
        );
        assert_eq!(detect_platform_from_url("https://acme.com"), None);
    }

    #[test]
    fn network_unreachable_detection() {
        assert!(is_network_unreachable_message("ERR_NAME_NOT_RESOLVED"));
        assert!(is_network_unreachable_message(
            "error sending request: dns error: failed to lookup"
        ));
        assert!(!is_network_unreachable_message("500 internal server error"));
    }
}
