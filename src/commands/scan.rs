use super::build_pipeline;
use anyhow::Result;
use jobscout_core::config::AppConfig;
use tracing::error;

pub async fn run(config: AppConfig, urls: Vec<String>, max_pages: Option<usize>) -> Result<()> {
    let mut config = config;
    if let Some(max_pages) = max_pages {
        config.discovery.max_pagination_pages = max_pages;
    }

    if urls.is_empty() {
        println!("Provide at least one URL to scan");
        return Ok(());
    }

    let (pipeline, _storage) = build_pipeline(&config).await?;

    for url in urls {
        match pipeline.scan(&url).await {
            Ok(outcome) => {
                println!(
                    "{}: {} active jobs (+{} new, {} reactivated, -{} removed){}",
                    outcome.site_domain,
                    outcome.jobs.len(),
                    outcome.sync.new_jobs.len(),
                    outcome.sync.reactivated_jobs.len(),
                    outcome.sync.removed_jobs.len(),
                    outcome
                        .career_url
                        .as_ref()
                        .map(|u| format!(" via {u}"))
                        .unwrap_or_default(),
                );
            }
            Err(e) => {
                error!(url, error = %e, "scan failed");
                println!("{url}: ERROR - {e}");
            }
        }
    }

    Ok(())
}
