use serde::Deserialize;

/// Top-level settings record, passed explicitly through constructors.
///
/// Never read from a process-wide singleton inside library crates; only the
/// binary loads this from disk/env and threads it down.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty toml document always parses with all-default fields")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "postgres://localhost/jobscout".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_recovery_factor")]
    pub recovery_factor: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_concurrent: default_max_concurrent(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            recovery_factor: default_recovery_factor(),
        }
    }
}

fn default_base_delay_ms() -> u64 {
    500
}
fn default_max_concurrent() -> usize {
    2
}
fn default_max_delay_ms() -> u64 {
    30_000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_recovery_factor() -> f64 {
    0.9
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
    #[serde(default = "default_max_scroll_iterations")]
    pub max_scroll_iterations: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_true(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            max_scroll_iterations: default_max_scroll_iterations(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_navigation_timeout_ms() -> u64 {
    30_000
}
fn default_max_scroll_iterations() -> u32 {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    #[serde(default)]
    pub openrouter_provider: Option<String>,
    #[serde(default)]
    pub openrouter_provider_order: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub openrouter_allow_fallbacks: bool,
    #[serde(default)]
    pub openrouter_require_parameters: bool,
    #[serde(default = "default_truncate_chars")]
    pub truncate_chars: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            openrouter_api_key: None,
            openrouter_provider: None,
            openrouter_provider_order: None,
            openrouter_allow_fallbacks: default_true(),
            openrouter_require_parameters: false,
            truncate_chars: default_truncate_chars(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}
fn default_truncate_chars() -> usize {
    80_000
}
fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_max_sitemap_urls")]
    pub max_sitemap_urls: usize,
    #[serde(default = "default_max_pagination_pages")]
    pub max_pagination_pages: usize,
    #[serde(default)]
    pub default_location: Option<String>,
    #[serde(default)]
    pub default_keywords: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_sitemap_urls: default_max_sitemap_urls(),
            max_pagination_pages: default_max_pagination_pages(),
            default_location: None,
            default_keywords: None,
        }
    }
}

fn default_max_sitemap_urls() -> usize {
    300
}
fn default_max_pagination_pages() -> usize {
    10
}
