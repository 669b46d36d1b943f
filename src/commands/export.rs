use anyhow::Result;
use jobscout_core::config::AppConfig;
use jobscout_storage::Storage;

pub async fn run(config: AppConfig, site: Option<String>, output: String) -> Result<()> {
    let storage = Storage::connect(&config.database.database_url).await?;

    let jobs = match site {
        Some(domain) => match storage.get_site_by_domain(&domain).await? {
            Some(site) => storage.get_active_jobs(site.id).await?,
            None => {
                println!("no tracked site matches domain {domain}");
                return Ok(());
            }
        },
        None => storage.all_active_jobs().await?,
    };

    let json = serde_json::to_string_pretty(&jobs)?;
    std::fs::write(&output, json)?;
    println!("wrote {} active jobs to {output}", jobs.len());

    Ok(())
}
