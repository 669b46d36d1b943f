//! Cross-domain result filters (§4.13 steps 3 and 6).

use jobscout_core::JobCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static DIGIT_LETTER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+[a-z]?)(.*)$").unwrap());

/// Company-name variants derived from a registrable domain's base label,
/// e.g. `2rsoftware.de` -> `["2rsoftware", "2r software", "2r"]`.
fn company_variants(domain: &str) -> Vec<String> {
    let bare = domain.strip_prefix("www.").unwrap_or(domain);
    let base = bare.split('.').next().unwrap_or(bare).to_lowercase();

    let mut variants = vec![base.clone(), base.replace('-', " ")];
    if let Some(caps) = DIGIT_LETTER_PREFIX.captures(&base) {
        let prefix = &caps[1];
        let suffix = &caps[2];
        if !suffix.is_empty() {
            variants.push(format!("{prefix} {suffix}"));
            variants.push(prefix.to_string());
        }
    }
    variants
}

/// Keeps only jobs whose title/location/description/company text mentions
/// a variant of `source_domain`'s company name. Falls back to the full set
/// when nothing matches, since the company name may simply not appear in
/// any job field (§4.13 step 3).
pub fn filter_by_source_company(jobs: Vec<JobCandidate>, source_domain: &str) -> Vec<JobCandidate> {
    if jobs.is_empty() {
        return jobs;
    }
    let variants = company_variants(source_domain);
    let filtered: Vec<JobCandidate> = jobs
        .iter()
        .filter(|job| {
            let text = format!(
                "{} {} {} {}",
                job.title,
                job.location.as_deref().unwrap_or(""),
                job.description.as_deref().unwrap_or(""),
                job.company.as_deref().unwrap_or(""),
            )
            .to_lowercase();
            variants.iter().any(|v| text.contains(v.as_str()))
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        jobs
    } else {
        filtered
    }
}

const SEARCH_PARAMS: &[&str] = &["search", "q", "query", "keyword", "keywords"];

/// Keeps only jobs whose title contains the URL's search/query/keyword
/// parameter value. Applied only when the final URL crossed onto a
/// different registered domain (§4.13 step 6) — internal navigation never
/// gets filtered this way.
pub fn filter_by_query_param(jobs: Vec<JobCandidate>, final_url: &str) -> Vec<JobCandidate> {
    if jobs.is_empty() {
        return jobs;
    }
    let Ok(parsed) = Url::parse(final_url) else {
        return jobs;
    };
    let search_term = parsed.query_pairs().find_map(|(key, value)| {
        SEARCH_PARAMS.contains(&key.as_ref()).then(|| value.to_lowercase())
    });
    let Some(search_term) = search_term.filter(|s| !s.is_empty()) else {
        return jobs;
    };

    let filtered: Vec<JobCandidate> = jobs
        .iter()
        .filter(|job| job.title.to_lowercase().contains(&search_term))
        .cloned()
        .collect();

    if filtered.is_empty() {
        jobs
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscout_core::ExtractionMethod;

    fn candidate(title: &str, company: Option<&str>) -> JobCandidate {
        let mut c = JobCandidate::new(title, ExtractionMethod::Llm);
        c.company = company.map(str::to_string);
        c
    }

    #[test]
    fn source_company_filter_keeps_matching_variants() {
        let jobs = vec![
            candidate("2R Software Backend Engineer", None),
            candidate("Unrelated Portal Job", Some("Synqony")),
        ];
        let filtered = filter_by_source_company(jobs, "2rsoftware.de");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "2R Software Backend Engineer");
    }

    #[test]
    fn source_company_filter_falls_back_to_all_on_no_match() {
        let jobs = vec![candidate("Completely Unrelated Role", None)];
        let filtered = filter_by_source_company(jobs, "2rsoftware.de");
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn query_param_filter_applies_case_insensitive_title_match() {
        let jobs = vec![candidate("Senior Center Engineer", None), candidate("Other Role", None)];
        let filtered = filter_by_query_param(jobs, "https://example.com/search?q=center");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Senior Center Engineer");
    }

    #[test]
    fn query_param_filter_is_noop_without_search_params() {
        let jobs = vec![candidate("Role A", None), candidate("Role B", None)];
        let filtered = filter_by_query_param(jobs, "https://example.com/jobs");
        assert_eq!(filtered.len(), 2);
    }
}
