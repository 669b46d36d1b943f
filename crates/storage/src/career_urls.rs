use crate::rows::CareerUrlRow;
use crate::{Storage, StorageError};
use jobscout_core::CareerUrl;
use sqlx::query_as;
use tracing::warn;

impl Storage {
    /// Upserts a career URL for a site. Re-adding a previously deactivated
    /// URL reactivates it and clears its failure count (§3 CareerUrl).
    pub async fn add_career_url(
        &self,
        site_id: i64,
        url: &str,
        platform: Option<&str>,
    ) -> Result<CareerUrl, StorageError> {
        let row = query_as::<_, CareerUrlRow>(
            r#"INSERT INTO career_urls (site_id, url, platform)
               VALUES ($1, $2, $3)
               ON CONFLICT (site_id, url) DO UPDATE SET
                   is_active = TRUE,
                   fail_count = 0,
                   platform = COALESCE(excluded.platform, career_urls.platform)
               RETURNING id, site_id, url, platform, is_active, fail_count,
                         last_success_at, last_fail_at, created_at"#,
        )
        .bind(site_id)
        .bind(url)
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    pub async fn mark_url_success(&self, url_id: i64) -> Result<(), StorageError> {
        sqlx::query(
            r#"UPDATE career_urls
               SET last_success_at = now(), fail_count = 0, is_active = TRUE
               WHERE id = $1"#,
        )
        .bind(url_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns `true` once `fail_count` reaches `max_failures`, at which
    /// point the URL is deactivated (§3: fail_count >= MAX_FAILURES).
    pub async fn mark_url_failed(
        &self,
        url_id: i64,
        max_failures: i32,
    ) -> Result<bool, StorageError> {
        sqlx::query(
            r#"UPDATE career_urls
               SET fail_count = fail_count + 1, last_fail_at = now()
               WHERE id = $1"#,
        )
        .bind(url_id)
        .execute(&self.pool)
        .await?;

        let fail_count: i32 =
            sqlx::query_scalar("SELECT fail_count FROM career_urls WHERE id = $1")
                .bind(url_id)
                .fetch_one(&self.pool)
                .await?;

        if fail_count >= max_failures {
            sqlx::query("UPDATE career_urls SET is_active = FALSE WHERE id = $1")
                .bind(url_id)
                .execute(&self.pool)
                .await?;
            warn!(url_id, max_failures, "career url deactivated after repeated failures");
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn active_career_urls(&self, site_id: i64) -> Result<Vec<CareerUrl>, StorageError> {
        let rows = query_as::<_, CareerUrlRow>(
            r#"SELECT id, site_id, url, platform, is_active, fail_count,
                      last_success_at, last_fail_at, created_at
               FROM career_urls WHERE site_id = $1 AND is_active = TRUE"#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
