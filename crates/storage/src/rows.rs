//! Wire-format row structs for Postgres, one per domain type. Kept separate
//! from `jobscout_core`'s domain types (rather than deriving `sqlx::FromRow`
//! on them directly) so the core crate stays free of a storage-engine
//! dependency; `sqlx::FromRow` can only be derived here because both the
//! trait and the row type are foreign to `jobscout-core` (§3, §10.2).

use jobscout_core::{CareerUrl, Job, JobHistoryEvent, JobHistoryKind, Site};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SiteRow {
    pub id: i64,
    pub domain: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_scanned_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<SiteRow> for Site {
    fn from(row: SiteRow) -> Self {
        Site {
            id: row.id,
            domain: row.domain,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            last_scanned_at: row.last_scanned_at,
        }
    }
}

#[derive(FromRow)]
pub struct CareerUrlRow {
    pub id: i64,
    pub site_id: i64,
    pub url: String,
    pub platform: Option<String>,
    pub is_active: bool,
    pub fail_count: i32,
    pub last_success_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_fail_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CareerUrlRow> for CareerUrl {
    fn from(row: CareerUrlRow) -> Self {
        CareerUrl {
            id: row.id,
            site_id: row.site_id,
            url: row.url,
            platform: row.platform,
            is_active: row.is_active,
            fail_count: row.fail_count,
            last_success_at: row.last_success_at,
            last_fail_at: row.last_fail_at,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
pub struct JobRow {
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
    pub skills: serde_json::Value,
    pub extraction_method: String,
    pub extraction_details: Option<serde_json::Value>,
    pub first_seen_at: chrono::DateTime<chrono::Utc>,
    pub last_seen_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            site_id: row.site_id,
            external_id: row.external_id,
            title: row.title,
            title_en: row.title_en,
            company: row.company,
            location: row.location,
            url: row.url,
            description: row.description,
            salary_from: row.salary_from,
            salary_to: row.salary_to,
            salary_currency: row.salary_currency,
            experience: row.experience,
            employment_type: row.employment_type,
            skills: serde_json::from_value(row.skills).unwrap_or_default(),
            extraction_method: row.extraction_method,
            extraction_details: row.extraction_details.unwrap_or(serde_json::Value::Null),
            first_seen_at: row.first_seen_at,
            last_seen_at: row.last_seen_at,
            is_active: row.is_active,
        }
    }
}

#[derive(FromRow)]
pub struct JobHistoryRow {
    pub id: i64,
    pub job_id: i64,
    pub event: String,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub details: Option<String>,
}

impl From<JobHistoryRow> for JobHistoryEvent {
    fn from(row: JobHistoryRow) -> Self {
        JobHistoryEvent {
            id: row.id,
            job_id: row.job_id,
            event: parse_history_kind(&row.event),
            changed_at: row.changed_at,
            details: row.details,
        }
    }
}

fn parse_history_kind(s: &str) -> JobHistoryKind {
    match s {
        "added" => JobHistoryKind::Added,
        "removed" => JobHistoryKind::Removed,
        "reactivated" => JobHistoryKind::Reactivated,
        _ => JobHistoryKind::Updated,
    }
}

pub fn history_kind_label(kind: JobHistoryKind) -> &'static str {
    match kind {
        JobHistoryKind::Added => "added",
        JobHistoryKind::Removed => "removed",
        JobHistoryKind::Reactivated => "reactivated",
        JobHistoryKind::Updated => "updated",
    }
}
