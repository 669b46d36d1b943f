use crate::rows::{history_kind_label, JobHistoryRow, JobRow};
use crate::{Storage, StorageError};
use jobscout_core::{normalize::dedup_key, Job, JobCandidate, JobHistoryEvent, JobHistoryKind, SyncResult};
use sqlx::query_as;
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl Storage {
    /// Reconciles `current_jobs` against what's stored for `site_id`,
    /// recording added/reactivated/removed transitions in `job_history`.
    /// Runs as a single transaction so a crash mid-sync never leaves a
    /// half-applied diff (§6, §4.12).
    pub async fn sync_jobs(
        &self,
        site_id: i64,
        current_jobs: &[JobCandidate],
    ) -> Result<SyncResult, StorageError> {
        let mut tx = self.pool.begin().await?;

        let existing: Vec<Job> = query_as::<_, JobRow>("SELECT * FROM jobs WHERE site_id = $1")
            .bind(site_id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let first_scan = existing.is_empty();

        let mut existing_by_key: HashMap<(String, String), Job> = existing
            .into_iter()
            .map(|j| (dedup_key(&j.title, j.location.as_deref()), j))
            .collect();

        let mut result = SyncResult {
            total_jobs: current_jobs.len(),
            first_scan,
            ..Default::default()
        };

        let mut seen_keys: HashSet<(String, String)> = HashSet::new();

        for candidate in current_jobs {
            let key = dedup_key(&candidate.title, candidate.location.as_deref());
            seen_keys.insert(key.clone());

            if let Some(existing_job) = existing_by_key.get(&key) {
                sqlx::query("UPDATE jobs SET last_seen_at = now() WHERE id = $1")
                    .bind(existing_job.id)
                    .execute(&mut *tx)
                    .await?;

                if !existing_job.is_active {
                    sqlx::query("UPDATE jobs SET is_active = TRUE WHERE id = $1")
                        .bind(existing_job.id)
                        .execute(&mut *tx)
                        .await?;
                    insert_history(&mut tx, existing_job.id, JobHistoryKind::Reactivated, Some("job reappeared after being removed")).await?;
                    debug!(title = %candidate.title, "reactivated job");
                    result.reactivated_jobs.push(existing_job.clone());
                }
            } else {
                let (dedup_title, dedup_location) = key;
                let inserted = insert_job(&mut tx, site_id, candidate, &dedup_title, &dedup_location).await?;
                insert_history(&mut tx, inserted.id, JobHistoryKind::Added, None).await?;
                debug!(title = %candidate.title, "new job");
                result.new_jobs.push(inserted);
            }
        }

        for (key, existing_job) in existing_by_key.iter_mut() {
            if !seen_keys.contains(key) && existing_job.is_active {
                sqlx::query("UPDATE jobs SET is_active = FALSE WHERE id = $1")
                    .bind(existing_job.id)
                    .execute(&mut *tx)
                    .await?;
                insert_history(&mut tx, existing_job.id, JobHistoryKind::Removed, Some("job no longer found on site")).await?;
                existing_job.is_active = false;
                debug!(title = %existing_job.title, "removed job");
                result.removed_jobs.push(existing_job.clone());
            }
        }

        tx.commit().await?;
        Ok(result)
    }

    pub async fn get_active_jobs(&self, site_id: i64) -> Result<Vec<Job>, StorageError> {
        let rows = query_as::<_, JobRow>("SELECT * FROM jobs WHERE site_id = $1 AND is_active = TRUE")
            .bind(site_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn set_title_en(&self, job_id: i64, title_en: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE jobs SET title_en = $1 WHERE id = $2")
            .bind(title_en)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn previous_job_count(&self, site_id: i64) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE site_id = $1")
            .bind(site_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn job_history(&self, job_id: i64) -> Result<Vec<JobHistoryEvent>, StorageError> {
        let rows = query_as::<_, JobHistoryRow>(
            "SELECT id, job_id, event, changed_at, details FROM job_history WHERE job_id = $1 ORDER BY changed_at",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

async fn insert_job(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    site_id: i64,
    candidate: &JobCandidate,
    dedup_title: &str,
    dedup_location: &str,
) -> Result<Job, StorageError> {
    let skills = serde_json::to_value(&candidate.skills).unwrap_or(serde_json::json!([]));
    let extraction_method = candidate.source_tag.as_tag(candidate.platform.as_deref());

    let row = query_as::<_, JobRow>(
        r#"INSERT INTO jobs (
               site_id, external_id, title, company, location, url,
               description, salary_from, salary_to, salary_currency,
               experience, employment_type, skills, extraction_method,
               dedup_title, dedup_location
           ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
           RETURNING *"#,
    )
    .bind(site_id)
    .bind(&candidate.external_id)
    .bind(&candidate.title)
    .bind(&candidate.company)
    .bind(&candidate.location)
    .bind(&candidate.url)
    .bind(&candidate.description)
    .bind(candidate.salary_from)
    .bind(candidate.salary_to)
    .bind(&candidate.salary_currency)
    .bind(&candidate.experience)
    .bind(&candidate.employment_type)
    .bind(skills)
    .bind(extraction_method)
    .bind(dedup_title)
    .bind(dedup_location)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row.into())
}

async fn insert_history(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    job_id: i64,
    event: JobHistoryKind,
    details: Option<&str>,
) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO job_history (job_id, event, details) VALUES ($1, $2, $3)")
        .bind(job_id)
        .bind(history_kind_label(event))
        .bind(details)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
