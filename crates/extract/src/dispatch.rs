//! Non-LLM extraction tiers, tried before falling back to the LLM (§4.7/§4.10).

use jobscout_ats::{pdf_link, schema_org};
use jobscout_core::JobCandidate;

/// Schema.org, then the PDF-filename heuristic. Empty if neither matches;
/// the caller falls through to the LLM tier.
pub fn extract_structured(html: &str, base_url: &str) -> Vec<JobCandidate> {
    let schema_jobs = schema_org::extract(html, base_url);
    if !schema_jobs.is_empty() {
        return schema_jobs;
    }
    pdf_link::extract(html, base_url)
}
