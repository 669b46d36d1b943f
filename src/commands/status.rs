use anyhow::Result;
use jobscout_core::config::AppConfig;
use jobscout_storage::Storage;

pub async fn run(config: AppConfig) -> Result<()> {
    let storage = Storage::connect(&config.database.database_url).await?;

    match storage.check_connectivity().await {
        Ok(()) => println!("Database: connected"),
        Err(e) => {
            println!("Database: ERROR - {e}");
            return Ok(());
        }
    }

    storage.migrate().await?;

    let sites = storage.site_count().await?;
    let total_jobs = storage.total_job_count().await?;
    let active_jobs = storage.active_job_count().await?;
    let cache_entries = storage.cache_entry_count().await?;

    println!("\n╔══════════════════════════════════════════════╗");
    println!("║              jobscout Status                 ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║ Sites tracked:      {:>20}    ║", sites);
    println!("║ Jobs (all time):    {:>20}    ║", total_jobs);
    println!("║ Jobs (active):      {:>20}    ║", active_jobs);
    println!("║ LLM cache entries:  {:>20}    ║", cache_entries);
    println!("╚══════════════════════════════════════════════╝\n");

    Ok(())
}
