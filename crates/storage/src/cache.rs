use crate::Storage;
use async_trait::async_trait;
use jobscout_llm::{CacheEntry, LlmCacheStore};
use std::time::Duration;

#[async_trait]
impl LlmCacheStore for Storage {
    async fn get_llm_cache(&self, key: &str) -> anyhow::Result<Option<CacheEntry>> {
        let row: Option<(String, i64)> = sqlx::query_as(
            r#"SELECT value, tokens_saved FROM llm_cache
               WHERE key = $1 AND created_at + make_interval(secs => ttl_seconds) > now()"#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let Some((value, tokens_saved)) = row else {
            return Ok(None);
        };

        sqlx::query("UPDATE llm_cache SET hit_count = hit_count + 1 WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(Some(CacheEntry { value, tokens_saved }))
    }

    async fn set_llm_cache(
        &self,
        key: &str,
        namespace: &str,
        value: &str,
        ttl: Duration,
        model: Option<&str>,
        tokens_saved: i64,
    ) -> anyhow::Result<()> {
        let ttl_seconds = ttl.as_secs() as i32;
        sqlx::query(
            r#"INSERT INTO llm_cache (key, namespace, value, model, tokens_saved, created_at, ttl_seconds)
               VALUES ($1, $2, $3, $4, $5, now(), $6)
               ON CONFLICT (key) DO UPDATE SET
                   value = excluded.value,
                   model = excluded.model,
                   tokens_saved = excluded.tokens_saved,
                   created_at = excluded.created_at,
                   ttl_seconds = excluded.ttl_seconds"#,
        )
        .bind(key)
        .bind(namespace)
        .bind(value)
        .bind(model)
        .bind(tokens_saved)
        .bind(ttl_seconds)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn cleanup_expired_cache(&self) -> anyhow::Result<u64> {
        let result = sqlx::query(
            "DELETE FROM llm_cache WHERE created_at + make_interval(secs => ttl_seconds) <= now()",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
