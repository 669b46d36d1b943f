//! Platform-tag dispatch (§4.6): one pure parser per ATS, selected by the
//! tag the Platform Detector assigned to a `CareerUrl`.

use crate::{deloitte, greenhouse, hibob, hrworks, lever, personio, recruitee, workable};
use jobscout_core::JobCandidate;

pub fn parse_by_platform(platform: &str, html: &str, base_url: &str) -> Vec<JobCandidate> {
    match platform {
        "greenhouse" => greenhouse::parse(html, base_url),
        "lever" => lever::parse(html, base_url),
        "workable" => workable::parse(html, base_url),
        "personio" => personio::parse(html, base_url),
        "recruitee" => recruitee::parse(html, base_url),
        "hibob" => hibob::parse(html, base_url),
        "hrworks" => hrworks::parse(html, base_url),
        "deloitte" => deloitte::parse(html, base_url),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_yields_no_jobs() {
        assert!(parse_by_platform("bamboohr", "<html></html>", "https://acme.com").is_empty());
    }
}
