use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobscout", about = "Job listing aggregator & change tracker")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one or more sites for job listings
    Scan {
        /// Site URLs to scan (homepage or a known career page)
        urls: Vec<String>,

        /// Override the configured pagination page cap
        #[arg(long)]
        max_pages: Option<usize>,
    },
    /// Show database connectivity and aggregate counts
    Status,
    /// Export active jobs as JSON
    Export {
        /// Restrict export to a single site domain
        #[arg(short, long)]
        site: Option<String>,

        /// Output file path
        #[arg(short, long, default_value = "jobs.json")]
        output: String,
    },
}
