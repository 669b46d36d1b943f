mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use jobscout_core::config::AppConfig;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, falling back to the embedded default");
        include_str!("../config/default.toml").to_string()
    });
    let mut config: AppConfig = toml::from_str(&config_str)?;
    apply_env_overrides(&mut config);

    match cli.command {
        Commands::Scan { urls, max_pages } => {
            commands::scan::run(config, urls, max_pages).await?;
        }
        Commands::Status => {
            commands::status::run(config).await?;
        }
        Commands::Export { site, output } => {
            commands::export::run(config, site, output).await?;
        }
    }

    Ok(())
}

/// `JOBSCOUT_`-prefixed environment overrides, layered on top of whatever
/// `config/default.toml` (or the `--config` path) already loaded.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(v) = std::env::var("JOBSCOUT_DATABASE_URL") {
        config.database.database_url = v;
    }
    if let Ok(v) = std::env::var("JOBSCOUT_LLM_OPENROUTER_API_KEY") {
        config.llm.openrouter_api_key = Some(v);
    }
    if let Ok(v) = std::env::var("JOBSCOUT_LLM_MODEL") {
        config.llm.model = v;
    }
    if let Ok(v) = std::env::var("JOBSCOUT_RATE_LIMIT_MAX_CONCURRENT") {
        if let Ok(n) = v.parse() {
            config.rate_limit.max_concurrent = n;
        }
    }
    if let Ok(v) = std::env::var("JOBSCOUT_BROWSER_HEADLESS") {
        config.browser.headless = v != "0" && v.to_lowercase() != "false";
    }
    if let Ok(v) = std::env::var("JOBSCOUT_DISCOVERY_MAX_PAGINATION_PAGES") {
        if let Ok(n) = v.parse() {
            config.discovery.max_pagination_pages = n;
        }
    }
}
