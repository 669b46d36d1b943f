mod cache;
mod career_urls;
mod error;
mod jobs;
mod rows;
mod sites;
mod stats;

pub use error::StorageError;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Persistence Store (§6): a Postgres connection pool plus the query
/// surface for sites, career URLs, jobs and the LLM cache.
#[derive(Clone)]
pub struct Storage {
    pool: PgPool,
}

impl Storage {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies pending migrations. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Other(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    // Exercised against a live database in `tests/` (§10.5); this crate's
    // unit tests cover only the pure SQL-string and row-mapping pieces
    // that don't require a connection.
}
