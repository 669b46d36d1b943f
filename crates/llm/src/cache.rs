//! LLM Cache (C9): namespace-keyed response cache with per-namespace TTLs.
//! Backed by whatever implements [`LlmCacheStore`] (the storage crate, in
//! production; an in-memory fake in tests).

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    Jobs,
    Translation,
    UrlDiscovery,
    CompanyInfo,
}

impl CacheNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::Jobs => "jobs",
            CacheNamespace::Translation => "translation",
            CacheNamespace::UrlDiscovery => "url",
            CacheNamespace::CompanyInfo => "company",
        }
    }

    /// TTL in seconds (§4.9).
    pub fn ttl(&self) -> Duration {
        match self {
            CacheNamespace::Jobs => Duration::from_secs(6 * 3600),
            CacheNamespace::Translation => Duration::from_secs(30 * 24 * 3600),
            CacheNamespace::UrlDiscovery => Duration::from_secs(7 * 24 * 3600),
            CacheNamespace::CompanyInfo => Duration::from_secs(30 * 24 * 3600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub tokens_saved: i64,
}

#[async_trait]
pub trait LlmCacheStore: Send + Sync {
    async fn get_llm_cache(&self, key: &str) -> anyhow::Result<Option<CacheEntry>>;
    async fn set_llm_cache(
        &self,
        key: &str,
        namespace: &str,
        value: &str,
        ttl: Duration,
        model: Option<&str>,
        tokens_saved: i64,
    ) -> anyhow::Result<()>;
    async fn cleanup_expired_cache(&self) -> anyhow::Result<u64>;
}

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub hits: u64,
    pub misses: u64,
    pub tokens_saved: u64,
}

impl SessionStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct LlmCache<S: LlmCacheStore> {
    store: S,
    model: Option<String>,
    hits: AtomicU64,
    misses: AtomicU64,
    tokens_saved: AtomicU64,
}

impl<S: LlmCacheStore> LlmCache<S> {
    pub fn new(store: S, model: Option<String>) -> Self {
        Self {
            store,
            model,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            tokens_saved: AtomicU64::new(0),
        }
    }

    /// `SHA-256(namespace:model:content)` truncated to 32 hex chars (§4.9).
    fn make_key(&self, namespace: CacheNamespace, content: &str) -> String {
        let model = self.model.as_deref().unwrap_or("default");
        let key_content = format!("{}:{model}:{content}", namespace.as_str());
        let digest = Sha256::digest(key_content.as_bytes());
        hex_prefix(&digest, 32)
    }

    pub async fn get(&self, namespace: CacheNamespace, content: &str) -> Option<String> {
        let key = self.make_key(namespace, content);
        match self.store.get_llm_cache(&key).await {
            Ok(Some(entry)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                self.tokens_saved
                    .fetch_add(entry.tokens_saved.max(0) as u64, Ordering::Relaxed);
                Some(entry.value)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM cache get error");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn set(&self, namespace: CacheNamespace, content: &str, value: &str, tokens_estimate: i64) {
        let key = self.make_key(namespace, content);
        if let Err(e) = self
            .store
            .set_llm_cache(&key, namespace.as_str(), value, namespace.ttl(), self.model.as_deref(), tokens_estimate)
            .await
        {
            tracing::warn!(error = %e, "LLM cache set error");
        }
    }

    /// Cache-or-compute. Empty results are never cached (§4.9) so a
    /// transient zero-job extraction doesn't poison the cache for the TTL.
    pub async fn get_or_compute<F, Fut>(
        &self,
        namespace: CacheNamespace,
        content: &str,
        tokens_estimate: i64,
        compute: F,
    ) -> anyhow::Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<String>>,
    {
        if let Some(cached) = self.get(namespace, content).await {
            return Ok(cached);
        }
        let result = compute().await?;
        if !result.is_empty() && result != "[]" && result != "{}" {
            self.set(namespace, content, &result, tokens_estimate).await;
        }
        Ok(result)
    }

    pub fn session_stats(&self) -> SessionStats {
        SessionStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            tokens_saved: self.tokens_saved.load(Ordering::Relaxed),
        }
    }

    pub async fn cleanup(&self) -> anyhow::Result<u64> {
        let count = self.store.cleanup_expired_cache().await?;
        if count > 0 {
            tracing::info!(count, "cleaned up expired LLM cache entries");
        }
        Ok(count)
    }
}

fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    let mut s = String::with_capacity(chars);
    for b in bytes {
        if s.len() >= chars {
            break;
        }
        s.push_str(&format!("{b:02x}"));
    }
    s.truncate(chars);
    s
}

/// Rough token estimate (1 token ~= 4 chars for English) (§4.9).
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        entries: Mutex<std::collections::HashMap<String, CacheEntry>>,
    }

    #[async_trait]
    impl LlmCacheStore for FakeStore {
        async fn get_llm_cache(&self, key: &str) -> anyhow::Result<Option<CacheEntry>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }
        async fn set_llm_cache(
            &self,
            key: &str,
            _namespace: &str,
            value: &str,
            _ttl: Duration,
            _model: Option<&str>,
            tokens_saved: i64,
        ) -> anyhow::Result<()> {
            self.entries.lock().unwrap().insert(
                key.to_string(),
                CacheEntry {
                    value: value.to_string(),
                    tokens_saved,
                },
            );
            Ok(())
        }
        async fn cleanup_expired_cache(&self) -> anyhow::Result<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn get_or_compute_does_not_cache_empty_results() {
        let cache = LlmCache::new(FakeStore::default(), Some("test-model".to_string()));
        let calls = std::sync::atomic::AtomicU64::new(0);

        for _ in 0..2 {
            calls.fetch_add(1, Ordering::Relaxed);
            let _ = cache
                .get_or_compute(CacheNamespace::Jobs, "content", 10, || async { Ok("[]".to_string()) })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::Relaxed), 2, "empty results must not short-circuit via cache");
    }

    #[tokio::test]
    async fn get_or_compute_caches_non_empty_results() {
        let cache = LlmCache::new(FakeStore::default(), None);
        let first = cache
            .get_or_compute(CacheNamespace::Translation, "hello", 5, || async {
                Ok("\"hallo\"".to_string())
            })
            .await
            .unwrap();
        assert_eq!(first, "\"hallo\"");

        let second = cache
            .get_or_compute(CacheNamespace::Translation, "hello", 5, || async {
                panic!("should not recompute a cache hit")
            })
            .await
            .unwrap();
        assert_eq!(second, "\"hallo\"");
        assert_eq!(cache.session_stats().hits, 1);
    }

    #[test]
    fn cache_key_is_32_hex_chars_and_model_scoped() {
        let cache_a = LlmCache::new(FakeStore::default(), Some("model-a".to_string()));
        let cache_b = LlmCache::new(FakeStore::default(), Some("model-b".to_string()));
        let key_a = cache_a.make_key(CacheNamespace::Jobs, "same content");
        let key_b = cache_b.make_key(CacheNamespace::Jobs, "same content");
        assert_eq!(key_a.len(), 32);
        assert_ne!(key_a, key_b);
    }
}
