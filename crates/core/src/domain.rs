use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One company domain. Created lazily on first successful discovery or when
/// caching a result; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub domain: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_scanned_at: Option<DateTime<Utc>>,
}

/// A discovered entry-point URL into a company's job listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerUrl {
    pub id: i64,
    pub site_id: i64,
    pub url: String,
    pub platform: Option<String>,
    pub is_active: bool,
    pub fail_count: i32,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_fail_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CareerUrl {
    /// Failures >= this threshold deactivate the URL (§3 CareerUrl invariant).
    pub const MAX_FAILURES: i32 = 3;
}

/// How a job record's fields were obtained; carried through to persistence
/// as `extraction_method` on the Job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    SchemaOrg,
    PdfLink,
    JobBoard,
    Llm,
}

impl ExtractionMethod {
    /// `job_board:<platform>` per §3; other variants are their bare tag.
    pub fn as_tag(&self, platform: Option<&str>) -> String {
        match (self, platform) {
            (ExtractionMethod::JobBoard, Some(p)) => format!("job_board:{p}"),
            (ExtractionMethod::JobBoard, None) => "job_board".to_string(),
            (ExtractionMethod::SchemaOrg, _) => "schema_org".to_string(),
            (ExtractionMethod::PdfLink, _) => "pdf_link".to_string(),
            (ExtractionMethod::Llm, _) => "llm".to_string(),
        }
    }
}

/// A transient, in-memory extracted record, not yet normalized or persisted.
/// Converted to a `Job` at the boundary of Persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCandidate {
    pub title: String,
    pub url: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub external_id: Option<String>,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub salary_currency: Option<String>,
    pub experience: Option<String>,
    pub employment_type: Option<String>,
    pub skills: Vec<String>,
    pub source_tag: ExtractionMethod,
    pub platform: Option<String>,
    pub confidence: f64,
    pub signals: HashMap<String, String>,
}

impl JobCandidate {
    pub fn new(title: impl Into<String>, source_tag: ExtractionMethod) -> Self {
        Self {
            title: title.into(),
            url: None,
            location: None,
            department: None,
            company: None,
            description: None,
            external_id: None,
            salary_from: None,
            salary_to: None,
            salary_currency: None,
            experience: None,
            employment_type: None,
            skills: Vec::new(),
            source_tag,
            platform: None,
            confidence: 1.0,
            signals: HashMap::new(),
        }
    }
}

/// One externally-observed vacancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub site_id: i64,
    pub external_id: Option<String>,
    pub title: String,
    pub title_en: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub salary_currency: Option<String>,
    pub experience: Option<String>,
    pub employment_type: Option<String>,
    pub skills: Vec<String>,
    pub extraction_method: String,
    pub extraction_details: serde_json::Value,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobHistoryKind {
    Added,
    Removed,
    Reactivated,
    Updated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHistoryEvent {
    pub id: i64,
    pub job_id: i64,
    pub event: JobHistoryKind,
    pub changed_at: DateTime<Utc>,
    pub details: Option<String>,
}

/// Delta from one `Persistence.sync_jobs` call (§4.12).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncResult {
    pub new_jobs: Vec<Job>,
    pub removed_jobs: Vec<Job>,
    pub reactivated_jobs: Vec<Job>,
    pub total_jobs: usize,
    pub first_scan: bool,
}
