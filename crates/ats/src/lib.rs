//! ATS Parsers (C6) and Structured Extractors (C7): one pure HTML/JSON
//! parser per platform, plus the Schema.org and PDF-filename extractors
//! that apply when no known platform was detected.

mod base;
pub mod deloitte;
pub mod greenhouse;
pub mod hibob;
pub mod hrworks;
pub mod lever;
pub mod odoo;
pub mod pdf_link;
pub mod personio;
pub mod recruitee;
pub mod registry;
pub mod schema_org;
pub mod workable;

pub use registry::parse_by_platform;

/// Filters non-job entries (initiative-application placeholders) and
/// company-name-shaped titles out of a freshly parsed candidate set (§4.6).
pub fn filter_non_job_candidates(candidates: Vec<jobscout_core::JobCandidate>) -> Vec<jobscout_core::JobCandidate> {
    candidates
        .into_iter()
        .filter(|c| !jobscout_core::normalize::is_non_job_entry(&c.title))
        .filter(|c| !jobscout_core::normalize::is_company_shaped_title(&c.title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscout_core::{ExtractionMethod, JobCandidate};

    #[test]
    fn filters_initiative_application_and_company_shaped_titles() {
        let candidates = vec![
            JobCandidate::new("Initiativbewerbung", ExtractionMethod::JobBoard),
            JobCandidate::new("Acme GmbH", ExtractionMethod::JobBoard),
            JobCandidate::new("Backend Engineer", ExtractionMethod::JobBoard),
        ];
        let filtered = filter_non_job_candidates(candidates);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Backend Engineer");
    }
}
