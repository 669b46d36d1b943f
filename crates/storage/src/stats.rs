use crate::rows::{JobRow, SiteRow};
use crate::{Storage, StorageError};
use jobscout_core::{Job, Site};
use sqlx::query_as;

impl Storage {
    pub async fn check_connectivity(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn site_count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sites")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn total_job_count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn active_job_count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn cache_entry_count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM llm_cache WHERE created_at + make_interval(secs => ttl_seconds) > now()",
        )
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn all_sites(&self) -> Result<Vec<Site>, StorageError> {
        let rows = query_as::<_, SiteRow>(
            "SELECT id, domain, name, description, created_at, last_scanned_at FROM sites ORDER BY domain",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All active jobs across every site, for an unfiltered export.
    pub async fn all_active_jobs(&self) -> Result<Vec<Job>, StorageError> {
        let rows = query_as::<_, JobRow>("SELECT * FROM jobs WHERE is_active = TRUE")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
