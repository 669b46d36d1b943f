pub mod export;
pub mod scan;
pub mod status;

use anyhow::Result;
use jobscout_core::config::AppConfig;
use jobscout_http::HttpFetcher;
use jobscout_llm::{LlmCache, OpenRouterConfig, OpenRouterProvider};
use jobscout_pipeline::SitePipeline;
use jobscout_ratelimit::{RateLimitConfig, RateLimiter};
use jobscout_storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Wires up every crate's concrete type from one loaded [`AppConfig`]
/// rather than reading from a process-wide singleton.
pub async fn build_pipeline(config: &AppConfig) -> Result<(SitePipeline<Storage>, Arc<Storage>)> {
    let storage = Storage::connect(&config.database.database_url).await?;
    storage.migrate().await?;
    let storage = Arc::new(storage);

    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        base_delay: Duration::from_millis(config.rate_limit.base_delay_ms),
        max_concurrent: config.rate_limit.max_concurrent,
        max_delay: Duration::from_millis(config.rate_limit.max_delay_ms),
        backoff_multiplier: config.rate_limit.backoff_multiplier,
        recovery_factor: config.rate_limit.recovery_factor,
    }));
    let fetcher = Arc::new(HttpFetcher::new(rate_limiter));

    let browser = match jobscout_browser::BrowserFetcher::new(jobscout_browser::BrowserConfig {
        headless: config.browser.headless,
        navigation_timeout: Duration::from_millis(config.browser.navigation_timeout_ms),
        max_scroll_iterations: config.browser.max_scroll_iterations,
    }) {
        Ok(browser) => Some(Arc::new(browser)),
        Err(e) => {
            warn!(error = %e, "headless browser unavailable, falling back to HTTP-only discovery");
            None
        }
    };

    let cache = Arc::new(LlmCache::new((*storage).clone(), Some(config.llm.model.clone())));

    let provider: Arc<dyn jobscout_llm::CompletionProvider> = Arc::new(OpenRouterProvider::new(OpenRouterConfig {
        api_key: config.llm.openrouter_api_key.clone().unwrap_or_default(),
        model: config.llm.model.clone(),
        provider: config.llm.openrouter_provider.clone(),
        provider_order: config.llm.openrouter_provider_order.clone(),
        allow_fallbacks: config.llm.openrouter_allow_fallbacks,
        require_parameters: config.llm.openrouter_require_parameters,
    }));

    let pipeline = SitePipeline::new(
        fetcher,
        browser,
        cache,
        provider,
        storage.clone(),
        config.discovery.max_pagination_pages,
    );

    Ok((pipeline, storage))
}
