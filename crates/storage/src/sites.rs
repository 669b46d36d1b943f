use crate::rows::SiteRow;
use crate::{Storage, StorageError};
use jobscout_core::Site;
use sqlx::query_as;

impl Storage {
    pub async fn get_site_by_domain(&self, domain: &str) -> Result<Option<Site>, StorageError> {
        let row = query_as::<_, SiteRow>(
            r#"SELECT id, domain, name, description, created_at, last_scanned_at
               FROM sites WHERE domain = $1"#,
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Idempotent: a site is created lazily on first successful discovery
    /// and never deleted (§3).
    pub async fn get_or_create_site(&self, domain: &str) -> Result<Site, StorageError> {
        if let Some(site) = self.get_site_by_domain(domain).await? {
            return Ok(site);
        }
        let site = query_as::<_, SiteRow>(
            r#"INSERT INTO sites (domain) VALUES ($1)
               ON CONFLICT (domain) DO UPDATE SET domain = excluded.domain
               RETURNING id, domain, name, description, created_at, last_scanned_at"#,
        )
        .bind(domain)
        .fetch_one(&self.pool)
        .await?;
        Ok(site.into())
    }

    pub async fn touch_last_scanned(&self, site_id: i64) -> Result<(), StorageError> {
        sqlx::query("UPDATE sites SET last_scanned_at = now() WHERE id = $1")
            .bind(site_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_site_description(&self, site_id: i64, description: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE sites SET description = $1 WHERE id = $2")
            .bind(description)
            .bind(site_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
