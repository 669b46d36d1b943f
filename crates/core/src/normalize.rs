//! Job Normalizer (C11): title/location canonicalization and non-job filtering.
//!
//! These functions are the dedup-key source for both the Hybrid Extractor's
//! pagination loop and the Persistence Store's `sync_jobs` algorithm, so they
//! live in `core` where both sides can depend on them without a cycle.

use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_SUFFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\s*job\s*advert\s*$",
        r"\s*job\s*posting\s*$",
        r"\s*stellenanzeige\s*$",
        r"\s*job\s*offer\s*$",
        r"\s*vacancy\s*$",
        r"\s*apply\s*now\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static GENDER_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([mwfdx/]+\)\s*").unwrap());
static GENDER_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+[mwfdx]/[mwfdx](/[mwfdx])?\s*$").unwrap());
static SALARY_APPENDIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[–-]\s*(vollzeit|teilzeit)?:?\s*[\d.,]+\s*[–-]\s*[\d.,]+\s*euro.*$")
        .unwrap()
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// German plural -> singular for common role words; applied after other
/// stripping so suffix removal doesn't fight the morphology table.
static GERMAN_PLURAL_SINGULAR: &[(&str, &str)] = &[
    ("telefonisten", "telefonist"),
    ("mitarbeiterin", "mitarbeiter"),
    ("mitarbeiterinnen", "mitarbeiter"),
    ("entwicklerinnen", "entwickler"),
    ("berater*innen", "berater"),
];

static COUNTRY_SUFFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r",?\s*deutschland\s*$",
        r",?\s*germany\s*$",
        r",?\s*österreich\s*$",
        r",?\s*austria\s*$",
        r",?\s*schweiz\s*$",
        r",?\s*switzerland\s*$",
        r",?\s*united\s*kingdom\s*$",
        r",?\s*uk\s*$",
        r",?\s*usa\s*$",
        r",?\s*united\s*states\s*$",
        r",?\s*netherlands\s*$",
        r",?\s*france\s*$",
        r",?\s*spain\s*$",
        r",?\s*italy\s*$",
        r",?\s*poland\s*$",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

static EMPLOYMENT_SUFFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r",?\s*vollzeit\s*$",
        r",?\s*teilzeit\s*$",
        r",?\s*full[\s-]*time\s*$",
        r",?\s*part[\s-]*time\s*$",
        r",?\s*remote\s*$",
        r",?\s*hybrid\s*$",
        r",?\s*inkl\.?\s*home\s*office\s*$",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

static NON_JOB_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)initiativbewerbung|spontanbewerbung|blindbewerbung|open\s*application|unsolicited\s*application")
        .unwrap()
});

static COMPANY_SHAPED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bGmbH\b|\bLimited\b|\bLtd\.?\b|[A-Z]+\s+International").unwrap());

/// Normalize a job title for deduplication (§4.11).
///
/// Idempotent: `normalize_title(normalize_title(x)) == normalize_title(x)`.
pub fn normalize_title(title: &str) -> String {
    let mut result = title.to_lowercase();
    result = result.trim().to_string();

    for re in TITLE_SUFFIXES.iter() {
        result = re.replace(&result, "").to_string();
    }

    result = GENDER_PARENS.replace_all(&result, " ").to_string();
    result = GENDER_BARE.replace(&result, "").to_string();
    result = SALARY_APPENDIX.replace(&result, "").to_string();

    for (plural, singular) in GERMAN_PLURAL_SINGULAR {
        if result.ends_with(plural) {
            let base = &result[..result.len() - plural.len()];
            result = format!("{base}{singular}");
        }
    }

    result = WHITESPACE.replace_all(result.trim(), " ").to_string();
    result
}

/// Normalize a location for deduplication (§4.11).
pub fn normalize_location(location: &str) -> String {
    let mut result = location.to_lowercase();
    result = result.trim().to_string();

    for re in COUNTRY_SUFFIXES.iter() {
        result = re.replace(&result, "").to_string();
    }
    for re in EMPLOYMENT_SUFFIXES.iter() {
        result = re.replace(&result, "").to_string();
    }

    result = WHITESPACE.replace_all(result.trim(), " ").to_string();
    result = result.trim_end_matches(',').trim().to_string();
    result
}

/// `(normalize(title), normalize(location))`; location absent collapses to
/// the empty string so `(site, title)`-only dedup (§3) still flows through
/// one key shape.
pub fn dedup_key(title: &str, location: Option<&str>) -> (String, String) {
    let t = normalize_title(title);
    let l = location.map(normalize_location).unwrap_or_default();
    (t, l)
}

/// True for submission channels masquerading as postings (§4.6/§4.11).
pub fn is_non_job_entry(title: &str) -> bool {
    NON_JOB_ENTRY.is_match(title)
}

/// True for titles that look like a company name rather than a role.
pub fn is_company_shaped_title(title: &str) -> bool {
    COMPANY_SHAPED_TITLE.is_match(title)
}

/// A URL is self-referencing (and hence unusable as a dedup primary key) if
/// it's empty, a bare `#`-fragment, or equal to the current page URL modulo
/// a trailing slash (§4.10 step 2).
pub fn is_self_referencing_url(candidate_url: &str, current_page_url: &str) -> bool {
    let trimmed = candidate_url.trim();
    if trimmed.is_empty() || trimmed == "#" || trimmed.starts_with('#') {
        return true;
    }
    trimmed.trim_end_matches('/') == current_page_url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_normalization_strips_gender_notation() {
        assert_eq!(
            normalize_title("Senior Developer (m/w/d)"),
            normalize_title("Senior Developer m/w/d")
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_title("Senior Developer (m/w/d)  ");
        assert_eq!(normalize_title(&once), once);
        let once_loc = normalize_location("Berlin, Deutschland");
        assert_eq!(normalize_location(&once_loc), once_loc);
    }

    #[test]
    fn location_strips_country_and_employment_mode() {
        assert_eq!(normalize_location("Erftstadt, Deutschland"), "erftstadt");
        assert_eq!(normalize_location("Berlin, Germany"), "berlin");
        assert_eq!(normalize_location("Remote, Deutschland"), "remote");
    }

    #[test]
    fn detects_non_job_entries() {
        assert!(is_non_job_entry("Initiativbewerbung"));
        assert!(is_non_job_entry("Spontanbewerbung (m/w/d)"));
        assert!(!is_non_job_entry("Senior Backend Engineer"));
    }

    #[test]
    fn self_referencing_hash_is_empty_url() {
        assert!(is_self_referencing_url("#", "https://x.com/jobs"));
        assert!(is_self_referencing_url(
            "https://x.com/jobs/",
            "https://x.com/jobs"
        ));
        assert!(!is_self_referencing_url(
            "https://x.com/jobs/42",
            "https://x.com/jobs"
        ));
    }
}
