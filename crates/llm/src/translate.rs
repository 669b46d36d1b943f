//! Fallback German -> English translation (§4.8): a dictionary of morpheme
//! substitutions, used when the LLM translation call fails or its output
//! fails validation. Morpheme (not whole-word) substitution means partial
//! hits inside longer words are possible and are not guarded against (§9).

use once_cell::sync::Lazy;
use regex::Regex;

static GARBAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\u{00a0}\?|\u{FFFD}").unwrap());

/// (German morpheme, English replacement), longest-first so "entwicklerin"
/// doesn't get partially eaten by a shorter "entwickler" rule first.
static DICTIONARY: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut table = vec![
        ("mitarbeiter", "employee"),
        ("entwickler", "developer"),
        ("berater", "consultant"),
        ("leiter", "manager"),
        ("kaufmann", "clerk"),
        ("buchhalter", "accountant"),
        ("techniker", "technician"),
        ("ingenieur", "engineer"),
        ("vertrieb", "sales"),
        ("personal", "hr"),
        ("stellenangebot", "job opening"),
        ("karriere", "career"),
        ("bewerbung", "application"),
        ("vollzeit", "full-time"),
        ("teilzeit", "part-time"),
        ("praktikum", "internship"),
        ("werkstudent", "working student"),
        ("ausbildung", "apprenticeship"),
    ];
    table.sort_by_key(|(de, _)| std::cmp::Reverse(de.len()));
    table
});

pub fn translate_fallback(text: &str) -> String {
    let mut result = text.to_string();
    for (de, en) in DICTIONARY.iter() {
        let pattern = format!(r"(?i)\b{}", regex::escape(de));
        if let Ok(re) = Regex::new(&pattern) {
            result = re.replace_all(&result, *en).to_string();
        }
    }
    result
}

/// Reject a translation response containing non-printable/encoding garbage
/// or an elision-only placeholder (§4.8). Rejected responses fall through
/// to [`translate_fallback`].
pub fn is_valid_translation(output: &str) -> bool {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "..." {
        return false;
    }
    !GARBAGE.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_common_role_morphemes() {
        assert_eq!(translate_fallback("Softwareentwickler"), "Softwaredeveloper");
        assert_eq!(translate_fallback("Vertriebsmitarbeiter"), "Vertriebsemployee");
    }

    #[test]
    fn rejects_ellipsis_only_output() {
        assert!(!is_valid_translation("..."));
        assert!(!is_valid_translation(""));
    }

    #[test]
    fn rejects_output_with_encoding_garbage() {
        assert!(!is_valid_translation("Senior Developer\u{FFFD}"));
    }

    #[test]
    fn accepts_clean_translation() {
        assert!(is_valid_translation("Senior Software Developer"));
    }
}
